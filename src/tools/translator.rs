//! English to German translator tool
//!
//! A phrase dictionary backed by a crude word-by-word fallback. Lookups never
//! fail: unknown words pass through unchanged and the first letter of the
//! output is capitalised.

use crate::core::{Tool, ToolArgs, ToolError, ToolResult};
use anyhow::Result;
use std::collections::HashMap;

const PHRASES: &[(&str, &str)] = &[
    ("good morning", "Guten Morgen"),
    ("good night", "Gute Nacht"),
    ("have a nice day", "Einen schönen Tag noch"),
    ("sunshine", "Sonnenschein"),
    ("hello", "Hallo"),
    ("hi", "Hallo"),
    ("thank you", "Danke"),
    ("goodbye", "Auf Wiedersehen"),
];

const WORDS: &[(&str, &str)] = &[
    ("good", "gut"),
    ("morning", "Morgen"),
    ("have", "haben"),
    ("a", "ein"),
    ("nice", "schön"),
    ("day", "Tag"),
    ("and", "und"),
    ("then", "dann"),
    ("translate", "übersetzen"),
];

/// Fixed English→German dictionary
#[derive(Debug, Clone)]
pub struct Dictionary {
    phrases: HashMap<String, String>,
    words: HashMap<String, String>,
}

impl Dictionary {
    pub fn new(phrases: &[(&str, &str)], words: &[(&str, &str)]) -> Self {
        Self {
            phrases: to_map(phrases),
            words: to_map(words),
        }
    }

    pub fn lookup(&self, text: &str) -> Option<&str> {
        self.phrases
            .get(&text.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Translate `text`, falling back to the word table on a phrase miss.
    pub fn translate(&self, text: &str) -> String {
        if let Some(hit) = self.lookup(text) {
            return hit.to_string();
        }

        let key = text.trim().to_lowercase();
        let out = key
            .split_whitespace()
            .map(|w| self.words.get(w).map(String::as_str).unwrap_or(w))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!(
            input = %key,
            output = %out,
            "phrase not in dictionary, used word fallback"
        );
        capitalize_first(&out)
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new(PHRASES, WORDS)
    }
}

fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.to_string()))
        .collect()
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Tool wrapper around the dictionary
pub struct TranslateTool {
    name: String,
    dictionary: Dictionary,
}

impl TranslateTool {
    pub fn new(dictionary: Dictionary) -> Self {
        Self {
            name: "translate".to_string(),
            dictionary,
        }
    }
}

impl Default for TranslateTool {
    fn default() -> Self {
        Self::new(Dictionary::default())
    }
}

impl Tool for TranslateTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Translate an English word or phrase into German using a fixed dictionary"
    }

    fn signature(&self) -> &str {
        "translate <text> [--target=de]"
    }

    fn validate_args(&self, args: &ToolArgs) -> Result<(), ToolError> {
        if args.text("text").is_none() {
            return Err(ToolError::InvalidArgs {
                message: "Usage: translate <text>".to_string(),
            });
        }
        if let Some(target) = args.get_named_arg("target") {
            if !target.eq_ignore_ascii_case("de") {
                return Err(ToolError::InvalidArgs {
                    message: format!(
                        "Unsupported target language '{}', only 'de' is available",
                        target
                    ),
                });
            }
        }
        Ok(())
    }

    fn execute(&mut self, args: &ToolArgs) -> Result<ToolResult> {
        let text = args.text("text").unwrap_or_default();
        let hit = self.dictionary.lookup(&text).is_some();
        let translated = self.dictionary.translate(&text);

        Ok(ToolResult::success_with_data(
            translated.clone(),
            serde_json::json!({
                "source": text,
                "source_lang": "en",
                "target_lang": "de",
                "translation": translated,
                "dictionary_hit": hit
            }),
        ))
    }

    fn get_parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "English word or phrase to translate"
                },
                "target": {
                    "type": "string",
                    "enum": ["de"]
                }
            },
            "required": ["text"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_phrase_translates_exactly() {
        let dictionary = Dictionary::default();
        for (key, value) in PHRASES {
            assert_eq!(dictionary.translate(key), *value);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dictionary = Dictionary::default();
        assert_eq!(dictionary.translate("  Good Morning "), "Guten Morgen");
        assert_eq!(dictionary.translate("SUNSHINE"), "Sonnenschein");
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let dictionary = Dictionary::default();
        let first = dictionary.translate("a nice day");
        assert_eq!(first, "Ein schön Tag");
        assert_eq!(dictionary.translate("a nice day"), first);

        let unknown = dictionary.translate("zebra");
        assert_eq!(unknown, "Zebra");
        assert_eq!(dictionary.translate("zebra"), unknown);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Dictionary::default().translate("   "), "");
    }

    #[test]
    fn test_translate_tool() {
        let mut tool = TranslateTool::default();
        let args = ToolArgs::from_args(&["have", "a", "nice", "day"]);
        assert!(tool.validate_args(&args).is_ok());

        let result = tool.execute(&args).unwrap();
        assert!(result.success);
        assert_eq!(result.message, "Einen schönen Tag noch");
        assert_eq!(result.data.unwrap()["dictionary_hit"], true);

        let bad = ToolArgs::from_args(&["hello", "--target=fr"]);
        assert!(tool.validate_args(&bad).is_err());
    }
}
