//! Hardcoded country → capital lookup

use crate::core::{Tool, ToolArgs, ToolError, ToolResult};
use anyhow::Result;
use std::collections::HashMap;

const CAPITALS: &[(&str, &str)] = &[
    ("japan", "Tokyo"),
    ("france", "Paris"),
    ("italy", "Rome"),
    ("germany", "Berlin"),
    ("spain", "Madrid"),
    ("portugal", "Lisbon"),
    ("united kingdom", "London"),
    ("canada", "Ottawa"),
    ("australia", "Canberra"),
    ("india", "New Delhi"),
    ("china", "Beijing"),
    ("brazil", "Brasília"),
    ("egypt", "Cairo"),
];

/// Read-only capitals table keyed by lowercase country name
#[derive(Debug, Clone)]
pub struct CapitalsTable {
    entries: HashMap<String, String>,
}

impl CapitalsTable {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(country, capital)| (country.to_lowercase(), capital.to_string()))
                .collect(),
        }
    }

    /// `None` is a miss; callers fall back to the answer provider.
    pub fn lookup(&self, country: &str) -> Option<&str> {
        let lower = country.trim().to_lowercase();
        let key = lower
            .trim_start_matches("the ")
            .trim_end_matches(|c: char| !c.is_alphanumeric());
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CapitalsTable {
    fn default() -> Self {
        Self::new(CAPITALS)
    }
}

/// Tool wrapper around the capitals table
pub struct CapitalLookupTool {
    name: String,
    table: CapitalsTable,
}

impl CapitalLookupTool {
    pub fn new(table: CapitalsTable) -> Self {
        Self {
            name: "capital_lookup".to_string(),
            table,
        }
    }
}

impl Default for CapitalLookupTool {
    fn default() -> Self {
        Self::new(CapitalsTable::default())
    }
}

impl Tool for CapitalLookupTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Look up the capital city of a country in a fixed table"
    }

    fn signature(&self) -> &str {
        "capital_lookup <country>"
    }

    fn validate_args(&self, args: &ToolArgs) -> Result<(), ToolError> {
        if args.text("country").is_none() {
            return Err(ToolError::InvalidArgs {
                message: "Usage: capital_lookup <country>".to_string(),
            });
        }
        Ok(())
    }

    fn execute(&mut self, args: &ToolArgs) -> Result<ToolResult> {
        let country = args.text("country").unwrap_or_default();
        match self.table.lookup(&country) {
            Some(capital) => Ok(ToolResult::success_with_data(
                capital,
                serde_json::json!({ "country": country, "capital": capital }),
            )),
            None => Ok(ToolResult::error_with_data(
                format!("No capital on record for '{}'", country),
                serde_json::json!({ "country": country, "error": "capital_miss" }),
            )),
        }
    }

    fn get_parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "country": {
                    "type": "string",
                    "description": "Country name, e.g. 'Japan'"
                }
            },
            "required": ["country"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let table = CapitalsTable::default();
        assert_eq!(table.lookup("Japan"), Some("Tokyo"));
        assert_eq!(table.lookup("the United Kingdom?"), Some("London"));
        assert_eq!(table.lookup("Atlantis"), None);
        assert_eq!(table.len(), CAPITALS.len());
    }

    #[test]
    fn test_capital_tool_miss_is_not_an_error() {
        let mut tool = CapitalLookupTool::default();
        let hit = tool.execute(&ToolArgs::from_args(&["France"])).unwrap();
        assert!(hit.success);
        assert_eq!(hit.message, "Paris");

        let miss = tool.execute(&ToolArgs::from_args(&["Atlantis"])).unwrap();
        assert!(!miss.success);
        assert_eq!(miss.data.unwrap()["error"], "capital_miss");
    }
}
