// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for Sortscribe

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Sortscribe operations
pub type Result<T> = std::result::Result<T, ScribeError>;

/// Sortscribe error types
#[derive(Error, Debug)]
pub enum ScribeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Attempt log error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("No free name for '{base}' after {attempts} suffixes")]
    PlacementConflict { base: String, attempts: u32 },

    #[error("Generator not available: {0}")]
    GeneratorUnavailable(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Transcription error: {0}")]
    Transcription(String),
}
