// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for Folio
//!
//! The configuration is loaded once and handed by reference to every
//! component that needs it; nothing reads ambient constants.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::extractors::KNOWN_EXTENSIONS;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Local model runtime
    #[serde(default)]
    pub engine: EngineConfig,

    /// Folder scanning and prompt excerpt settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Filename generation rules
    #[serde(default)]
    pub naming: NamingConfig,

    /// Metadata tagger settings
    #[serde(default)]
    pub tagging: TaggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EngineConfig {
    /// Program to spawn for each model query
    #[serde(default = "default_command")]
    pub command: String,
    /// Arguments passed to the program
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScanConfig {
    /// Extensions (without the dot, lowercase) the agent will look at
    #[serde(default = "default_extensions")]
    pub supported_extensions: Vec<String>,
    /// Number of content characters embedded in the analysis prompt
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NamingConfig {
    /// Maximum stem length, measured before the extension
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Maximum number of tokens joined into a name
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    /// Words that never contribute to a name (case-insensitive)
    #[serde(default = "default_stoplist")]
    pub stoplist: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TaggingConfig {
    /// Number of content characters shown to the model
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    /// Name of the alternate data stream holding the description
    #[serde(default = "default_stream_name")]
    pub stream_name: String,
}

// Default value functions
fn default_command() -> String { "ollama".to_string() }
fn default_args() -> Vec<String> { vec!["run".to_string(), "llama3".to_string()] }
fn default_max_prompt_chars() -> usize { 2000 }
fn default_max_name_length() -> usize { 60 }
fn default_max_tokens() -> usize { 5 }
fn default_preview_chars() -> usize { 1000 }
fn default_stream_name() -> String { "description.txt".to_string() }

fn default_extensions() -> Vec<String> {
    vec!["txt", "pdf", "docx"].into_iter().map(String::from).collect()
}

fn default_stoplist() -> Vec<String> {
    vec![
        "final", "latest", "version", "important",
        "document", "file", "new", "copy", "scan",
    ].into_iter().map(String::from).collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: default_args(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            supported_extensions: default_extensions(),
            max_prompt_chars: default_max_prompt_chars(),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            max_name_length: default_max_name_length(),
            max_tokens: default_max_tokens(),
            stoplist: default_stoplist(),
        }
    }
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
            stream_name: default_stream_name(),
        }
    }
}

impl ScanConfig {
    /// Check an extension (with or without leading dot) against the supported set
    pub fn is_supported(&self, extension: &str) -> bool {
        let ext = extension.trim_start_matches('.');
        !ext.is_empty()
            && self.supported_extensions.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

impl NamingConfig {
    /// True when a cleaned token is a non-informative stoplist word
    pub fn is_generic(&self, word: &str) -> bool {
        self.stoplist.iter().any(|s| s.eq_ignore_ascii_case(word))
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)
                .map_err(|e| crate::FolioError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the tools cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        use crate::FolioError::Config;

        if self.engine.command.trim().is_empty() {
            return Err(Config("engine.command must not be empty".to_string()));
        }
        if self.naming.max_name_length == 0 {
            return Err(Config("naming.max_name_length must be at least 1".to_string()));
        }
        if self.naming.max_tokens == 0 {
            return Err(Config("naming.max_tokens must be at least 1".to_string()));
        }
        if self.scan.max_prompt_chars == 0 {
            return Err(Config("scan.max_prompt_chars must be at least 1".to_string()));
        }
        for ext in &self.scan.supported_extensions {
            let bare = ext.trim_start_matches('.').to_lowercase();
            if !KNOWN_EXTENSIONS.contains(&bare.as_str()) {
                return Err(Config(format!(
                    "No text extractor for extension '{}' (known: {})",
                    ext,
                    KNOWN_EXTENSIONS.join(", ")
                )));
            }
        }
        if self.tagging.stream_name.trim().is_empty() || self.tagging.stream_name.contains(':') {
            return Err(Config("tagging.stream_name must be a plain, non-empty name".to_string()));
        }

        Ok(())
    }
}
