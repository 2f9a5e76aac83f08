// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for Sortscribe

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// DATA-HOME root; placement routing is disabled when unset
    #[serde(default)]
    pub data_home: Option<String>,

    /// Generation engine configuration
    pub engine: EngineConfig,

    /// Content analysis limits
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Retry/feedback loop settings
    #[serde(default)]
    pub negotiation: NegotiationConfig,

    /// Attempt log settings
    #[serde(default)]
    pub attempt_log: AttemptLogConfig,

    /// Audio transcription settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,
}

/// Which generation backend to talk to
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    Ollama,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EngineConfig {
    pub provider: Provider,
    pub url: String,
    pub model: String,
    /// Never written back to disk; usually supplied by `ANTHROPIC_API_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_lines_per_file")]
    pub lines_per_file: usize,
    #[serde(default = "default_snippet_max_len")]
    pub snippet_max_len: usize,
    #[serde(default = "default_readable_extensions")]
    pub readable_extensions: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NegotiationConfig {
    #[serde(default = "default_retry_limit")]
    pub retry_limit: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AttemptLogConfig {
    #[serde(default = "default_attempt_log_path")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TranscriptionConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_transcription_url")]
    pub url: String,
    #[serde(default = "default_transcription_model")]
    pub model: String,
}

// Default value functions
fn default_timeout() -> u64 { 60 }
fn default_retries() -> u32 { 2 }
fn default_max_output_tokens() -> u32 { 75 }
fn default_temperature() -> f32 { 0.3 }
fn default_max_depth() -> usize { 3 }
fn default_max_files() -> usize { 25 }
fn default_lines_per_file() -> usize { 10 }
fn default_snippet_max_len() -> usize { 500 }
fn default_retry_limit() -> u32 { 3 }
fn default_attempt_log_path() -> String { "naming_ab_testing_log.csv".to_string() }
fn default_transcription_url() -> String { "http://localhost:8000".to_string() }
fn default_transcription_model() -> String { "whisper-1".to_string() }

fn default_readable_extensions() -> Vec<String> {
    vec![
        "txt", "md", "py", "js", "html", "css", "json", "xml",
        "yaml", "yml", "cfg", "ini", "log", "csv", "tsv"
    ].into_iter().map(String::from).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_home: None,
            engine: EngineConfig::default(),
            analysis: AnalysisConfig::default(),
            negotiation: NegotiationConfig::default(),
            attempt_log: AttemptLogConfig::default(),
            transcription: TranscriptionConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Anthropic,
            url: "https://api.anthropic.com".to_string(),
            model: "claude-3-haiku-20240307".to_string(),
            api_key: None,
            timeout_secs: default_timeout(),
            retries: default_retries(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_files: default_max_files(),
            lines_per_file: default_lines_per_file(),
            snippet_max_len: default_snippet_max_len(),
            readable_extensions: default_readable_extensions(),
        }
    }
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            retry_limit: default_retry_limit(),
        }
    }
}

impl Default for AttemptLogConfig {
    fn default() -> Self {
        Self {
            path: default_attempt_log_path(),
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: default_transcription_url(),
            model: default_transcription_model(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::ScribeError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `DATA_HOME` and `ANTHROPIC_API_KEY` overrides.
    ///
    /// `lookup` is normally `|k| std::env::var(k).ok()`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(home) = lookup("DATA_HOME").filter(|v| !v.trim().is_empty()) {
            self.data_home = Some(home);
        }
        if let Some(key) = lookup("ANTHROPIC_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.engine.api_key = Some(key);
        }
    }

    /// DATA-HOME root, but only when its `filetree/roots` structure exists
    pub fn active_data_home(&self) -> Option<PathBuf> {
        let root = PathBuf::from(self.data_home.as_ref()?);
        let roots = root.join("filetree").join("roots");
        if roots.is_dir() {
            Some(root)
        } else {
            tracing::warn!(
                "DATA-HOME structure not found at {:?}; proceeding without DATA-HOME integration",
                roots
            );
            None
        }
    }
}
