//! Offline answer provider with a handful of canned facts

use super::{is_arithmetic_question, AnswerProvider, Persona, ARITHMETIC_REFUSAL};

struct CannedFact {
    triggers: &'static [&'static str],
    steps: &'static [&'static str],
    answer: &'static str,
}

const FACTS: &[CannedFact] = &[
    CannedFact {
        triggers: &[
            "colors in a rainbow",
            "colours in a rainbow",
            "colors of the rainbow",
            "colours of the rainbow",
        ],
        steps: &[
            "Recall the acronym ROYGBIV.",
            "List each color from longest to shortest wavelength.",
            "Note that the order follows how water droplets refract sunlight.",
        ],
        answer: "Red, orange, yellow, green, blue, indigo and violet.",
    },
    CannedFact {
        triggers: &["sky is blue", "sky blue"],
        steps: &[
            "Sunlight contains many wavelengths.",
            "Air molecules scatter shorter wavelengths more efficiently (Rayleigh scattering).",
            "Blue light (shorter wavelength) is scattered across the sky and reaches our eyes.",
        ],
        answer: "Because shorter wavelengths (blue) scatter more in the atmosphere (Rayleigh scattering).",
    },
    CannedFact {
        triggers: &["hottest planet", "planet is the hottest"],
        steps: &[
            "Compare average surface temperatures of planets.",
            "Note that Venus has a runaway greenhouse effect.",
            "Conclude the hottest planet is Venus.",
        ],
        answer: "Venus is the hottest planet in our solar system due to an extreme greenhouse effect.",
    },
    CannedFact {
        triggers: &["capital of france"],
        steps: &[
            "Identify the country in question: France.",
            "Recall its seat of government.",
        ],
        answer: "Paris",
    },
    CannedFact {
        triggers: &["capital of italy"],
        steps: &[
            "Identify the country in question: Italy.",
            "Recall its seat of government.",
        ],
        answer: "Rome",
    },
    CannedFact {
        triggers: &["distance between earth and mars", "distance from earth to mars"],
        steps: &[
            "Both planets orbit the Sun at different speeds.",
            "Their separation therefore changes continuously.",
            "Give the closest and farthest approximate values.",
        ],
        answer: "It varies widely (about 54.6 million km at closest to over 400 million km).",
    },
];

const GENERIC_STEPS: &[&str] = &[
    "Identify the core question.",
    "Recall relevant facts.",
    "Synthesize a concise, structured answer.",
];
const GENERIC_STRUCTURED_ANSWER: &str = "Here is a clear, structured answer to your question.";
const GENERIC_ANSWER: &str = "Here is a concise answer.";

/// Deterministic provider used when no API key is configured
#[derive(Debug, Clone)]
pub struct MockProvider {
    persona: Persona,
}

impl MockProvider {
    pub fn new(persona: Persona) -> Self {
        Self { persona }
    }

    fn find(question: &str) -> Option<&'static CannedFact> {
        let lower = question.to_lowercase();
        FACTS
            .iter()
            .find(|fact| fact.triggers.iter().any(|t| lower.contains(t)))
    }
}

impl AnswerProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn ask(&self, question: &str) -> String {
        if is_arithmetic_question(question) {
            return ARITHMETIC_REFUSAL.to_string();
        }

        let fact = Self::find(question);
        match self.persona {
            Persona::StepByStep => match fact {
                Some(fact) => format_step_by_step(fact.steps, fact.answer),
                None => format_step_by_step(GENERIC_STEPS, GENERIC_STRUCTURED_ANSWER),
            },
            Persona::Concise => format!("Answer: {}", fact.map_or(GENERIC_ANSWER, |f| f.answer)),
            Persona::Agent => fact.map_or(GENERIC_ANSWER, |f| f.answer).to_string(),
        }
    }
}

/// Numbered reasoning list followed by a final `Answer:` line.
pub fn format_step_by_step(steps: &[&str], final_answer: &str) -> String {
    let mut lines = vec!["Step-by-step reasoning:".to_string()];
    lines.extend(
        steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step)),
    );
    lines.push("--".to_string());
    lines.push(format!("Answer: {}", final_answer));
    lines.join("\n")
}
