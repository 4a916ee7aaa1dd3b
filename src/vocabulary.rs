//! Vocabulary tables - maps spoken spellings to canonical tokens
//!
//! Commands and parameters live in two separate tables. Each entry is a
//! [`Word`]: one canonical value plus every spelling the recognizer is known
//! to produce for it (synonyms and common misrecognitions).
//!
//! Matching is exact membership on the lowercased spelling. There is no fuzzy
//! matching: a misrecognition only resolves if it is listed.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::VocabularyError;

/// Canonical value of the correction command
pub const BACK: &str = "back";
/// Canonical value of the command that discards pending parameters
pub const RESET: &str = "reset";

/// A canonical token and the spoken forms that resolve to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub value: String,
    pub spellings: BTreeSet<String>,
}

impl Word {
    pub fn new(value: &str, spellings: &[&str]) -> Self {
        Self {
            value: value.to_string(),
            spellings: spellings.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self.value.as_str() {
            BACK => CommandKind::Back,
            RESET => CommandKind::Reset,
            value => CommandKind::Content(value.to_string()),
        }
    }
}

/// How a resolved command affects the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// Remove the most recent output record
    Back,
    /// Discard pending parameters and go back to waiting
    Reset,
    /// Opens a listening session and labels the records that follow
    Content(String),
}

/// Spelling lookup for one token category
#[derive(Debug, Clone, Default)]
struct Table {
    words: Vec<Word>,
    /// Lowercase spelling -> index into `words`
    index: HashMap<String, usize>,
}

impl Table {
    fn build(name: &'static str, words: Vec<Word>) -> Result<Self, VocabularyError> {
        let mut seen = HashSet::new();
        let mut index = HashMap::new();
        let mut normalized = Vec::with_capacity(words.len());

        for word in words {
            let value = word.value.trim().to_string();
            if value.is_empty() {
                return Err(VocabularyError::EmptyValue { table: name });
            }
            if !seen.insert(value.clone()) {
                return Err(VocabularyError::DuplicateValue { table: name, value });
            }

            let spellings: BTreeSet<String> = word
                .spellings
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
            if spellings.is_empty() {
                return Err(VocabularyError::NoSpellings { table: name, value });
            }

            let position = normalized.len();
            for spelling in &spellings {
                // First definition wins, later duplicates are unreachable
                if let Some(&owner) = index.get(spelling) {
                    let owner: &Word = &normalized[owner];
                    tracing::warn!(
                        "{} spelling '{}' of '{}' already belongs to '{}', ignoring",
                        name,
                        spelling,
                        value,
                        owner.value
                    );
                    continue;
                }
                index.insert(spelling.clone(), position);
            }

            normalized.push(Word { value, spellings });
        }

        Ok(Self {
            words: normalized,
            index,
        })
    }

    fn resolve(&self, word: &str) -> Option<&Word> {
        let lower = word.to_lowercase();
        self.index.get(&lower).map(|&i| &self.words[i])
    }
}

/// Command and parameter tables used to resolve recognized words
#[derive(Debug, Clone)]
pub struct Vocabulary {
    commands: Table,
    parameters: Table,
}

impl Vocabulary {
    /// Build and validate a vocabulary
    ///
    /// Canonical values must be non-empty, unique within their table, and
    /// must not appear in both tables.
    pub fn new(commands: Vec<Word>, parameters: Vec<Word>) -> Result<Self, VocabularyError> {
        let commands = Table::build("command", commands)?;
        let parameters = Table::build("parameter", parameters)?;

        if let Some(shared) = commands
            .words
            .iter()
            .find(|c| parameters.words.iter().any(|p| p.value == c.value))
        {
            return Err(VocabularyError::SharedValue(shared.value.clone()));
        }

        tracing::debug!(
            "Vocabulary loaded: {} commands ({} spellings), {} parameters ({} spellings)",
            commands.words.len(),
            commands.index.len(),
            parameters.words.len(),
            parameters.index.len()
        );

        Ok(Self {
            commands,
            parameters,
        })
    }

    /// Resolve a word against the command table (case-insensitive)
    pub fn resolve_command(&self, word: &str) -> Option<&Word> {
        self.commands.resolve(word)
    }

    /// Resolve a word against the parameter table (case-insensitive)
    pub fn resolve_parameter(&self, word: &str) -> Option<&Word> {
        self.parameters.resolve(word)
    }

    pub fn commands(&self) -> &[Word] {
        &self.commands.words
    }

    pub fn parameters(&self) -> &[Word] {
        &self.parameters.words
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            commands: Table::build("command", default_commands()).unwrap_or_default(),
            parameters: Table::build("parameter", default_parameters()).unwrap_or_default(),
        }
    }
}

/// Built-in command table
pub fn default_commands() -> Vec<Word> {
    vec![
        Word::new("code", &["code", "cold", "cod", "good"]),
        Word::new("count", &["count", "countdown", "caunt"]),
        Word::new(RESET, &["reset", "present"]),
        Word::new(BACK, &["back", "bak", "bac", "bec", "beck"]),
    ]
}

/// Built-in parameter table: the ten digits
pub fn default_parameters() -> Vec<Word> {
    vec![
        Word::new("0", &["zero", "0", "ziro"]),
        Word::new("1", &["one", "1", "uan"]),
        Word::new("2", &["two", "2", "chu", "to"]),
        Word::new("3", &["three", "3", "tree", "free"]),
        Word::new("4", &["4", "four", "for"]),
        Word::new("5", &["5", "five"]),
        Word::new("6", &["6", "six", "sics"]),
        Word::new("7", &["7", "seven"]),
        Word::new("8", &["8", "eight", "eit", "ete"]),
        Word::new("9", &["9", "nine", "nain", "-line", "nin", "line"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_synonyms() {
        let vocab = Vocabulary::default();

        for spelling in ["code", "cold", "cod", "good"] {
            assert_eq!(vocab.resolve_command(spelling).map(|w| w.value.as_str()), Some("code"));
        }
        for spelling in ["back", "bak", "bac", "bec", "beck"] {
            assert_eq!(vocab.resolve_command(spelling).map(|w| w.value.as_str()), Some("back"));
        }
        assert_eq!(vocab.resolve_command("present").map(|w| w.value.as_str()), Some("reset"));
        assert_eq!(vocab.resolve_command("countdown").map(|w| w.value.as_str()), Some("count"));
    }

    #[test]
    fn test_parameter_synonyms() {
        let vocab = Vocabulary::default();

        for spelling in ["two", "2", "chu", "to"] {
            assert_eq!(vocab.resolve_parameter(spelling).map(|w| w.value.as_str()), Some("2"));
        }
        assert_eq!(vocab.resolve_parameter("-line").map(|w| w.value.as_str()), Some("9"));
        assert_eq!(vocab.resolve_parameter("ziro").map(|w| w.value.as_str()), Some("0"));
    }

    #[test]
    fn test_case_insensitive() {
        let vocab = Vocabulary::default();

        assert_eq!(vocab.resolve_parameter("TWO").map(|w| w.value.as_str()), Some("2"));
        assert_eq!(vocab.resolve_command("Code").map(|w| w.value.as_str()), Some("code"));
        assert_eq!(vocab.resolve_command("BECK").map(|w| w.value.as_str()), Some("back"));
    }

    #[test]
    fn test_no_fuzzy_matching() {
        let vocab = Vocabulary::default();

        assert!(vocab.resolve_command("codes").is_none());
        assert!(vocab.resolve_command("cde").is_none());
        assert!(vocab.resolve_parameter("twoo").is_none());
        assert!(vocab.resolve_parameter("").is_none());
    }

    #[test]
    fn test_tables_are_separate() {
        let vocab = Vocabulary::default();

        assert!(vocab.resolve_parameter("code").is_none());
        assert!(vocab.resolve_command("one").is_none());
    }

    #[test]
    fn test_command_kind() {
        let vocab = Vocabulary::default();

        assert_eq!(vocab.resolve_command("bec").map(Word::kind), Some(CommandKind::Back));
        assert_eq!(vocab.resolve_command("reset").map(Word::kind), Some(CommandKind::Reset));
        assert_eq!(
            vocab.resolve_command("caunt").map(Word::kind),
            Some(CommandKind::Content("count".to_string()))
        );
    }

    #[test]
    fn test_default_matches_validated_build() {
        let built = Vocabulary::new(default_commands(), default_parameters()).unwrap();
        let fallback = Vocabulary::default();

        assert_eq!(built.commands(), fallback.commands());
        assert_eq!(built.parameters(), fallback.parameters());
        assert_eq!(built.parameters().len(), 10);
    }

    #[test]
    fn test_shared_value_rejected() {
        let commands = vec![Word::new("7", &["seven"])];
        let result = Vocabulary::new(commands, default_parameters());
        assert_eq!(result.unwrap_err(), VocabularyError::SharedValue("7".to_string()));
    }

    #[test]
    fn test_invalid_entries_rejected() {
        let result = Vocabulary::new(vec![Word::new(" ", &["x"])], vec![]);
        assert_eq!(result.unwrap_err(), VocabularyError::EmptyValue { table: "command" });

        let result = Vocabulary::new(vec![], vec![Word::new("1", &[])]);
        assert!(matches!(result, Err(VocabularyError::NoSpellings { .. })));

        let result = Vocabulary::new(
            vec![Word::new("code", &["code"]), Word::new("code", &["cold"])],
            vec![],
        );
        assert!(matches!(result, Err(VocabularyError::DuplicateValue { .. })));
    }

    #[test]
    fn test_first_spelling_owner_wins() {
        let parameters = vec![Word::new("2", &["to", "two"]), Word::new("4", &["to", "for"])];
        let vocab = Vocabulary::new(vec![], parameters).unwrap();

        assert_eq!(vocab.resolve_parameter("to").map(|w| w.value.as_str()), Some("2"));
        assert_eq!(vocab.resolve_parameter("for").map(|w| w.value.as_str()), Some("4"));
    }

    #[test]
    fn test_spellings_normalized() {
        let word = Word {
            value: "code".to_string(),
            spellings: ["  CODE ".to_string()].into_iter().collect(),
        };
        let vocab = Vocabulary::new(vec![word], vec![]).unwrap();
        assert!(vocab.resolve_command("code").is_some());
    }
}
