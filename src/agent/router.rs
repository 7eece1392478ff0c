//! Query router: split a query into clauses, classify each clause, resolve it
//!
//! Classification is an ordered chain of matchers and the first match wins:
//! translate, then arithmetic, then capital-of, with a generic fact as the
//! catch-all. A clause that would match several rules therefore always lands
//! in the earliest one.

use super::memory::{Memory, Step, StepKind, StepValue};
use crate::core::{ToolArgs, ToolRegistry};
use crate::provider::{is_arithmetic_question, AnswerProvider};
use crate::tools::calculator::{self, format_number};
use crate::tools::{Expression, Operation};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i),|;|\b(?:and|also|then)\b").expect("valid separator regex")
});

static TRANSLATE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\btranslate\s+(?:the\s+(?:word|phrase)\s+)?(?:'([^']+)'|"([^"]+)")"#)
        .expect("valid translate regex")
});

static TRANSLATE_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\btranslate\s+(?:the\s+(?:word|phrase)\s+)?([\p{L}'-]+(?:\s+[\p{L}'-]+)*?)(?:\s+(?:into|to|in)\s+german)?\s*[.?!]*$",
    )
    .expect("valid translate regex")
});

static CAPITAL_OF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcapital\s+(?:city\s+)?of\s+(?:the\s+)?(\p{L}[\p{L} .'-]*?)\s*[?.!]*$")
        .expect("valid capital regex")
});

/// Words that open a new intent; `and` only separates clauses before one of these.
const LEAD_WORDS: &[&str] = &[
    "also", "then", "translate", "add", "multiply", "subtract", "divide", "calculate", "compute",
    "sum", "tell", "give", "find", "show", "explain", "list", "name", "what", "what's", "who",
    "where", "when", "why", "how", "which", "please", "can", "could",
];

/// The classified purpose of one clause
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Translate { text: String },
    Arithmetic(Expression),
    Capital { country: String },
    Fact { question: String },
}

type Matcher = fn(&str) -> Option<Intent>;

/// Priority order of the classification chain
const MATCHERS: &[Matcher] = &[match_translate, match_arithmetic, match_capital];

pub fn match_translate(clause: &str) -> Option<Intent> {
    let text = TRANSLATE_QUOTED
        .captures(clause)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .or_else(|| TRANSLATE_BARE.captures(clause).and_then(|caps| caps.get(1)))?
        .as_str()
        .trim()
        .to_string();
    Some(Intent::Translate { text })
}

pub fn match_arithmetic(clause: &str) -> Option<Intent> {
    calculator::parse(clause).ok().map(Intent::Arithmetic)
}

pub fn match_capital(clause: &str) -> Option<Intent> {
    let caps = CAPITAL_OF.captures(clause)?;
    Some(Intent::Capital {
        country: caps[1].trim().to_string(),
    })
}

/// Run the matcher chain; anything unrecognized becomes a fact question.
pub fn classify(clause: &str) -> Intent {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(clause))
        .unwrap_or_else(|| Intent::Fact {
            question: clause.trim().to_string(),
        })
}

/// Byte ranges covered by quoted spans. An apostrophe inside a word
/// ("what's") neither opens nor closes a quote.
fn quoted_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut open: Option<(usize, char)> = None;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        let next = chars.peek().map(|(_, n)| *n);
        match open {
            None if (c == '\'' || c == '"') && prev.map_or(true, char::is_whitespace) => {
                open = Some((idx, c));
            }
            Some((start, quote)) if c == quote && !next.is_some_and(char::is_alphanumeric) => {
                spans.push((start, idx + c.len_utf8()));
                open = None;
            }
            _ => {}
        }
        prev = Some(c);
    }
    spans
}

fn next_word(text: &str) -> String {
    text.trim_start()
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '\'')
        .collect::<String>()
        .to_lowercase()
}

/// Split a query into clauses on commas, semicolons, `also`, `then` and
/// clause-joining `and`. Separators inside quotes are ignored, as are commas
/// inside numbers. Never returns an empty list.
pub fn split_clauses(query: &str) -> Vec<String> {
    let spans = quoted_spans(query);
    let in_quotes = |pos: usize| spans.iter().any(|&(s, e)| pos > s && pos < e);

    let mut clauses = Vec::new();
    let mut start = 0;
    for m in SEPARATOR.find_iter(query) {
        if in_quotes(m.start()) {
            continue;
        }
        let before = query[..m.start()].chars().next_back();
        let after = query[m.end()..].chars().next();
        let split = match m.as_str().to_lowercase().as_str() {
            "," => !(before.is_some_and(|c| c.is_ascii_digit())
                && after.is_some_and(|c| c.is_ascii_digit())),
            "and" => LEAD_WORDS.contains(&next_word(&query[m.end()..]).as_str()),
            _ => true,
        };
        if split {
            clauses.push(&query[start..m.start()]);
            start = m.end();
        }
    }
    clauses.push(&query[start..]);

    let clauses: Vec<String> = clauses
        .into_iter()
        .map(|c| c.trim_matches(|ch: char| ch.is_whitespace() || ch == ',' || ch == ';'))
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    if clauses.is_empty() {
        vec![query.trim().to_string()]
    } else {
        clauses
    }
}

fn describe_arithmetic(expr: &Expression) -> String {
    let (a, b) = (format_number(expr.a), format_number(expr.b));
    match expr.op {
        Operation::Add => format!("Add {} and {}", a, b),
        Operation::Subtract => format!("Subtract {} from {}", b, a),
        Operation::Multiply => format!("Multiply {} and {}", a, b),
        Operation::Divide => format!("Divide {} by {}", a, b),
    }
}

/// Multi-step agent core
pub struct Router {
    registry: ToolRegistry,
    provider: Box<dyn AnswerProvider>,
}

impl Router {
    pub fn new(provider: Box<dyn AnswerProvider>) -> Self {
        Self::with_registry(crate::create_tool_registry(), provider)
    }

    pub fn with_registry(registry: ToolRegistry, provider: Box<dyn AnswerProvider>) -> Self {
        Self { registry, provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Split, classify and resolve every clause of `query`.
    pub fn process(&mut self, query: &str) -> (Memory, String) {
        let mut memory = Memory::new();
        for clause in split_clauses(query) {
            let intent = classify(&clause);
            debug!(clause = %clause, intent = ?intent, "classified clause");
            memory.push(self.resolve(&clause, intent));
        }
        let summary = memory.render();
        (memory, summary)
    }

    fn resolve(&mut self, clause: &str, intent: Intent) -> Step {
        match intent {
            Intent::Translate { text } => {
                let description = format!("Translate '{}' to German", text);
                let args = ToolArgs::default().named("text", text.as_str());
                match self.registry.execute_tool("translate", &args) {
                    Ok(result) if result.success => Step::succeeded(
                        StepKind::Translate,
                        clause,
                        description,
                        StepValue::Text(result.message),
                    ),
                    Ok(result) => {
                        Step::failed(StepKind::Translate, clause, description, result.message)
                    }
                    Err(e) => Step::failed(StepKind::Translate, clause, description, e.to_string()),
                }
            }
            Intent::Arithmetic(expr) => {
                let kind = StepKind::from(expr.op);
                let description = describe_arithmetic(&expr);
                let args = ToolArgs::default()
                    .named("op", expr.op.name())
                    .named("a", expr.a.to_string())
                    .named("b", expr.b.to_string());
                match self.registry.execute_tool("calculate", &args) {
                    Ok(result) => match result.number() {
                        Some(value) if result.success => {
                            Step::succeeded(kind, clause, description, StepValue::Number(value))
                        }
                        _ => Step::failed(kind, clause, description, result.message),
                    },
                    Err(e) => Step::failed(kind, clause, description, e.to_string()),
                }
            }
            Intent::Capital { country } => {
                let description = format!("Capital of {}", country);
                let args = ToolArgs::default().named("country", country.as_str());
                match self.registry.execute_tool("capital_lookup", &args) {
                    Ok(result) if result.success => Step::succeeded(
                        StepKind::Capital,
                        clause,
                        description,
                        StepValue::Text(result.message),
                    ),
                    _ => {
                        debug!(country = %country, "capital not in table, asking provider");
                        let answer = self
                            .provider
                            .ask(&format!("What is the capital of {}?", country));
                        Step::succeeded(
                            StepKind::Capital,
                            clause,
                            description,
                            StepValue::Text(answer),
                        )
                    }
                }
            }
            Intent::Fact { question } if is_arithmetic_question(&question) => {
                debug!(clause = %clause, "arithmetic the calculator cannot parse");
                Step::failed(
                    StepKind::Fact,
                    clause,
                    format!("Calculate '{}'", question),
                    "unsupported expression, try '12 * 7' or 'add 45 and 30'",
                )
            }
            Intent::Fact { question } => {
                let answer = self.provider.ask(&question);
                Step::succeeded(
                    StepKind::Fact,
                    clause,
                    format!("LLM fact lookup: '{}'", question),
                    StepValue::Text(answer),
                )
            }
        }
    }
}
