use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::VocabularyError;
use crate::vocabulary::{Vocabulary, Word, default_commands, default_parameters};

pub const DEFAULT_CONFIG_PATH: &str = "speechcmd.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Locale hint handed to the speech recognizer
    #[serde(default = "default_language")]
    pub language: String,
    /// Ask the recognizer for partial (preview) results
    #[serde(default = "default_partial_results")]
    pub partial_results: bool,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            partial_results: default_partial_results(),
            vocabulary: VocabularyConfig::default(),
        }
    }
}

fn default_language() -> String {
    "en-PH".into()
}

fn default_partial_results() -> bool {
    true
}

// ============================================================================
// Vocabulary Config
// ============================================================================

/// Command and parameter tables, replaceable without touching code
///
/// ```toml
/// [[vocabulary.commands]]
/// value = "code"
/// spellings = ["code", "cold", "cod", "good"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VocabularyConfig {
    #[serde(default = "default_commands")]
    pub commands: Vec<Word>,
    #[serde(default = "default_parameters")]
    pub parameters: Vec<Word>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            commands: default_commands(),
            parameters: default_parameters(),
        }
    }
}

impl VocabularyConfig {
    pub fn build(&self) -> Result<Vocabulary, VocabularyError> {
        Vocabulary::new(self.commands.clone(), self.parameters.clone())
    }
}

impl Config {
    /// Load from a TOML file, falling back to defaults when it doesn't exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
