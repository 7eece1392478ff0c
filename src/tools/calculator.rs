//! Calculator tool for two-operand arithmetic
//!
//! Recognizes symbolic expressions (`15 + 23`, `12 x 7`) and verb forms
//! (`add 45 and 30`, `9 times 8`, `subtract 4 from 10`). Anything that does not
//! contain exactly two operands and one recognized operator is rejected with
//! [`CalcError::NotArithmetic`] so callers can try something else.

use crate::core::{Tool, ToolArgs, ToolError, ToolResult};
use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// A signed decimal, optionally with thousands separators (`1,000`)
const NUMBER: &str = r"-?\d{1,3}(?:,\d{3})+(?:\.\d+)?|-?\d+(?:\.\d+)?";

// `x` may sit directly before an operand, as in `12x7`.
static OPERAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?:^|[^\w.]|x)({})", NUMBER)).expect("valid operand regex")
});

static SYMBOLIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"({n})\s*([-+*/x×])\s*({n})", n = NUMBER))
        .expect("valid symbolic regex")
});

static SUBTRACT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\bsubtract\s+({n})\s+from\s+({n})", n = NUMBER))
        .expect("valid subtract regex")
});

static KEYWORDS: LazyLock<Vec<(Operation, Regex)>> = LazyLock::new(|| {
    [
        (Operation::Add, r"\b(?:add|adds|added|plus|sum)\b"),
        (Operation::Subtract, r"\b(?:subtract|minus|difference)\b"),
        (Operation::Multiply, r"\b(?:multiply|multiplied|times|product)\b"),
        (Operation::Divide, r"\b(?:divide|divided|quotient)\b"),
    ]
    .into_iter()
    .map(|(op, pattern)| (op, Regex::new(pattern).expect("valid keyword regex")))
    .collect()
});

/// Calculator failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("not an arithmetic expression: '{0}'")]
    NotArithmetic(String),
    #[error("cannot divide by zero")]
    DivisionByZero,
}

impl CalcError {
    /// Stable identifier used in tool result payloads
    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::NotArithmetic(_) => "not_arithmetic",
            CalcError::DivisionByZero => "division_by_zero",
        }
    }
}

/// Supported binary operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Operation::Add),
            "-" => Some(Operation::Subtract),
            "*" | "x" | "×" => Some(Operation::Multiply),
            "/" => Some(Operation::Divide),
            _ => None,
        }
    }

    pub fn apply(self, a: f64, b: f64) -> Result<f64, CalcError> {
        match self {
            Operation::Add => Ok(a + b),
            Operation::Subtract => Ok(a - b),
            Operation::Multiply => Ok(a * b),
            Operation::Divide if b == 0.0 => Err(CalcError::DivisionByZero),
            Operation::Divide => Ok(a / b),
        }
    }
}

impl FromStr for Operation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if let Some(op) = Operation::from_symbol(&lower) {
            return Ok(op);
        }
        match lower.as_str() {
            "add" | "plus" | "sum" => Ok(Operation::Add),
            "subtract" | "minus" => Ok(Operation::Subtract),
            "multiply" | "times" | "product" => Ok(Operation::Multiply),
            "divide" | "quotient" => Ok(Operation::Divide),
            _ => Err(CalcError::NotArithmetic(s.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed two-operand expression
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub op: Operation,
    pub a: f64,
    pub b: f64,
}

impl Expression {
    pub fn new(op: Operation, a: f64, b: f64) -> Self {
        Self { op, a, b }
    }

    pub fn evaluate(&self) -> Result<f64, CalcError> {
        self.op.apply(self.a, self.b)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            format_number(self.a),
            self.op.symbol(),
            format_number(self.b)
        )
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.replace(',', "").parse().ok()
}

/// Parse free text into a two-operand expression.
pub fn parse(text: &str) -> Result<Expression, CalcError> {
    let lower = text.trim().to_lowercase();
    let not_arithmetic = || CalcError::NotArithmetic(text.trim().to_string());

    let operands: Vec<f64> = OPERAND
        .captures_iter(&lower)
        .filter_map(|caps| parse_number(&caps[1]))
        .collect();
    if operands.len() != 2 {
        return Err(not_arithmetic());
    }

    if let Some(caps) = SYMBOLIC.captures(&lower) {
        let op = Operation::from_symbol(&caps[2]).ok_or_else(not_arithmetic)?;
        let a = parse_number(&caps[1]).ok_or_else(not_arithmetic)?;
        let b = parse_number(&caps[3]).ok_or_else(not_arithmetic)?;
        return Ok(Expression::new(op, a, b));
    }

    if let Some(caps) = SUBTRACT_FROM.captures(&lower) {
        let subtrahend = parse_number(&caps[1]).ok_or_else(not_arithmetic)?;
        let minuend = parse_number(&caps[2]).ok_or_else(not_arithmetic)?;
        return Ok(Expression::new(Operation::Subtract, minuend, subtrahend));
    }

    let mut matched = KEYWORDS
        .iter()
        .filter(|(_, re)| re.is_match(&lower))
        .map(|(op, _)| *op);
    match (matched.next(), matched.next()) {
        (Some(op), None) => Ok(Expression::new(op, operands[0], operands[1])),
        _ => Err(not_arithmetic()),
    }
}

/// Parse and evaluate free text.
pub fn evaluate(text: &str) -> Result<f64, CalcError> {
    parse(text)?.evaluate()
}

/// Render a number the way `%g` would for the values these demos produce.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Tool wrapper around the calculator
pub struct CalculatorTool {
    name: String,
}

impl CalculatorTool {
    pub fn new() -> Self {
        Self {
            name: "calculate".to_string(),
        }
    }

    fn expression_from_args(args: &ToolArgs) -> Result<Expression, CalcError> {
        if let (Some(op), Some(a), Some(b)) = (
            args.get_named_arg("op"),
            args.get_named_arg("a"),
            args.get_named_arg("b"),
        ) {
            let op: Operation = op.parse()?;
            let a = a
                .trim()
                .parse()
                .map_err(|_| CalcError::NotArithmetic(a.clone()))?;
            let b = b
                .trim()
                .parse()
                .map_err(|_| CalcError::NotArithmetic(b.clone()))?;
            return Ok(Expression::new(op, a, b));
        }
        parse(&args.text("expression").unwrap_or_default())
    }
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Evaluate a two-operand arithmetic expression (add, subtract, multiply, divide)"
    }

    fn signature(&self) -> &str {
        "calculate <expression> OR calculate --op=<add|subtract|multiply|divide> --a=<n> --b=<n>"
    }

    fn validate_args(&self, args: &ToolArgs) -> Result<(), ToolError> {
        let has_pair = ["op", "a", "b"]
            .iter()
            .all(|key| args.get_named_arg(key).is_some());
        if args.text("expression").is_none() && !has_pair {
            return Err(ToolError::InvalidArgs {
                message: "Usage: calculate <expression> or calculate --op=<op> --a=<n> --b=<n>"
                    .to_string(),
            });
        }
        Ok(())
    }

    fn execute(&mut self, args: &ToolArgs) -> Result<ToolResult> {
        let outcome = Self::expression_from_args(args)
            .and_then(|expr| expr.evaluate().map(|value| (expr, value)));

        match outcome {
            Ok((expr, value)) => {
                tracing::debug!(expression = %expr, result = value, "calculated");
                Ok(ToolResult::success_with_data(
                    format_number(value),
                    serde_json::json!({
                        "operation": expr.op,
                        "a": expr.a,
                        "b": expr.b,
                        "result": value
                    }),
                ))
            }
            Err(e) => Ok(ToolResult::error_with_data(
                e.to_string(),
                serde_json::json!({ "error": e.kind() }),
            )),
        }
    }

    fn get_parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "Free-text expression such as '15 + 23' or 'multiply 9 and 8'"
                },
                "op": {
                    "type": "string",
                    "enum": ["add", "subtract", "multiply", "divide"]
                },
                "a": { "type": "number" },
                "b": { "type": "number" }
            },
            "required": []
        })
    }
}
