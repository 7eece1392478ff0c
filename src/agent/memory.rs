//! Short-lived step memory for one agent query

use crate::tools::calculator::format_number;
use crate::tools::Operation;
use serde::Serialize;
use std::fmt;

/// What a step did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Translate,
    Add,
    Subtract,
    Multiply,
    Divide,
    Capital,
    Fact,
}

impl StepKind {
    pub fn label(self) -> &'static str {
        match self {
            StepKind::Translate => "translate",
            StepKind::Add => "add",
            StepKind::Subtract => "subtract",
            StepKind::Multiply => "multiply",
            StepKind::Divide => "divide",
            StepKind::Capital => "capital",
            StepKind::Fact => "fact",
        }
    }
}

impl From<Operation> for StepKind {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Add => StepKind::Add,
            Operation::Subtract => StepKind::Subtract,
            Operation::Multiply => StepKind::Multiply,
            Operation::Divide => StepKind::Divide,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for StepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepValue::Number(n) => f.write_str(&format_number(*n)),
            StepValue::Text(t) => f.write_str(t),
        }
    }
}

/// One resolved unit of work
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub kind: StepKind,
    /// The clause that produced this step
    pub raw_text: String,
    /// Human-readable description of the action taken
    pub description: String,
    pub result: StepValue,
    pub succeeded: bool,
}

impl Step {
    pub fn succeeded(
        kind: StepKind,
        raw_text: impl Into<String>,
        description: impl Into<String>,
        result: StepValue,
    ) -> Self {
        Self {
            kind,
            raw_text: raw_text.into(),
            description: description.into(),
            result,
            succeeded: true,
        }
    }

    pub fn failed(
        kind: StepKind,
        raw_text: impl Into<String>,
        description: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            raw_text: raw_text.into(),
            description: description.into(),
            result: StepValue::Text(error.into()),
            succeeded: false,
        }
    }

    fn outcome(&self) -> String {
        if self.succeeded {
            self.result.to_string()
        } else {
            format!("failed: {}", self.result)
        }
    }
}

/// Ordered steps for a single query. Order is clause order in the source text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Memory {
    steps: Vec<Step>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|s| s.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Transcript of every step followed by a labelled summary.
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = self
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("Step {}: {} -> {}", i + 1, step.description, step.outcome()))
            .collect();

        lines.push(String::new());
        lines.push("Summary:".to_string());
        lines.extend(self.steps.iter().enumerate().map(|(i, step)| {
            format!("- step{} ({}): {}", i + 1, step.kind.label(), step.outcome())
        }));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_order_and_labels() {
        let mut memory = Memory::new();
        memory.push(Step::succeeded(
            StepKind::Multiply,
            "Multiply 9 and 8",
            "Multiply 9 and 8",
            StepValue::Number(72.0),
        ));
        memory.push(Step::succeeded(
            StepKind::Capital,
            "tell me the capital of Japan",
            "Capital of Japan",
            StepValue::Text("Tokyo".to_string()),
        ));

        assert_eq!(
            memory.render(),
            "Step 1: Multiply 9 and 8 -> 72\n\
             Step 2: Capital of Japan -> Tokyo\n\
             \n\
             Summary:\n\
             - step1 (multiply): 72\n\
             - step2 (capital): Tokyo"
        );
    }

    #[test]
    fn test_failed_step_rendering() {
        let mut memory = Memory::new();
        memory.push(Step::failed(
            StepKind::Divide,
            "divide 8 by 0",
            "Divide 8 by 0",
            "cannot divide by zero",
        ));
        assert!(memory
            .render()
            .contains("- step1 (divide): failed: cannot divide by zero"));
    }

    #[test]
    fn test_serializes_to_json() {
        let mut memory = Memory::new();
        memory.push(Step::succeeded(
            StepKind::Add,
            "add 45 and 30",
            "Add 45 and 30",
            StepValue::Number(75.0),
        ));
        let json = serde_json::to_value(&memory).unwrap();
        assert_eq!(json["steps"][0]["kind"], "add");
        assert_eq!(json["steps"][0]["result"], 75.0);
        assert_eq!(json["steps"][0]["succeeded"], true);
    }
}
