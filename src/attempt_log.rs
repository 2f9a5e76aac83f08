// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Append-only CSV log of naming attempts
//!
//! One row per decision point. The log is written for offline analysis and
//! never read back by the engine; a failed write is reported and swallowed.

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::taxonomy::is_news_transcript;
use crate::Result;

/// What happened at a decision point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    Accept,
    Retry,
    Cancel,
    GenerationFailed,
    MaxRetriesReached,
    MovedSuccessfully,
    MoveFailed,
    LocalRenameSuccess,
    RenameFailed,
    TotalFailure,
}

/// Keyword buckets for feedback tagging, evaluated independently in order
const FEEDBACK_BUCKETS: &[(&str, &[&str])] = &[
    ("specificity", &["generic", "specific", "vague", "unclear"]),
    ("length", &["long", "short", "length", "brief", "verbose"]),
    ("location", &["location", "directory", "path", "folder", "place"]),
    ("content_focus", &["topic", "subject", "focus", "about", "theme"]),
    ("abbreviations", &["abbreviation", "abbrev", "short", "expand"]),
    ("missing_info", &["missing", "include", "add", "mention"]),
    ("context", &["context", "background", "situation"]),
];

/// Pipe-joined tags for `feedback`; `"other"` when nothing matches, empty
/// when there is no feedback
pub fn categorize_feedback(feedback: &str) -> String {
    if feedback.is_empty() {
        return String::new();
    }

    let lowered = feedback.to_lowercase();
    let tags: Vec<&str> = FEEDBACK_BUCKETS
        .iter()
        .filter(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(tag, _)| *tag)
        .collect();

    if tags.is_empty() {
        "other".to_string()
    } else {
        tags.join("|")
    }
}

/// Per-session facts repeated on every row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: String,
    pub source_path: PathBuf,
    pub files_analyzed: usize,
    pub has_audio_files: bool,
}

fn yes_no<S: Serializer>(value: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "yes" } else { "no" })
}

/// One row of the attempt log
#[derive(Debug, Clone, Serialize)]
pub struct AttemptLogEntry {
    pub timestamp: DateTime<Local>,
    pub session_id: String,
    pub attempt_number: u32,
    pub source_path: String,
    pub generated_name: String,
    pub generated_name_length: usize,
    pub optimal_parent_path: String,
    pub user_action: UserAction,
    pub user_feedback: String,
    pub final_destination: String,
    pub files_analyzed: usize,
    #[serde(serialize_with = "yes_no")]
    pub has_audio_files: bool,
    #[serde(serialize_with = "yes_no")]
    pub source_is_news_transcript: bool,
    pub content_type_prefix: String,
    pub feedback_length: usize,
    pub feedback_categories: String,
}

impl AttemptLogEntry {
    pub fn new(ctx: &SessionContext, attempt_number: u32, user_action: UserAction) -> Self {
        Self {
            timestamp: Local::now(),
            session_id: ctx.session_id.clone(),
            attempt_number,
            source_path: ctx.source_path.to_string_lossy().to_string(),
            generated_name: String::new(),
            generated_name_length: 0,
            optimal_parent_path: String::new(),
            user_action,
            user_feedback: String::new(),
            final_destination: String::new(),
            files_analyzed: ctx.files_analyzed,
            has_audio_files: ctx.has_audio_files,
            source_is_news_transcript: is_news_transcript(&ctx.source_path),
            content_type_prefix: String::new(),
            feedback_length: 0,
            feedback_categories: String::new(),
        }
    }

    pub fn with_name(self, name: &str) -> Self {
        let content_type_prefix = if name.chars().count() >= 4 {
            name.chars().take(4).collect()
        } else {
            String::new()
        };
        Self {
            generated_name: name.to_string(),
            generated_name_length: name.chars().count(),
            content_type_prefix,
            ..self
        }
    }

    pub fn with_parent(self, parent: impl AsRef<str>) -> Self {
        Self { optimal_parent_path: parent.as_ref().to_string(), ..self }
    }

    pub fn with_feedback(self, feedback: &str) -> Self {
        Self {
            user_feedback: feedback.to_string(),
            feedback_length: feedback.chars().count(),
            feedback_categories: categorize_feedback(feedback),
            ..self
        }
    }

    pub fn with_destination(self, destination: &Path) -> Self {
        Self { final_destination: destination.to_string_lossy().to_string(), ..self }
    }
}

/// Appends [`AttemptLogEntry`] rows to a CSV file
#[derive(Debug, Clone)]
pub struct AttemptLogger {
    path: PathBuf,
}

impl AttemptLogger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append `entry`; failures are logged, never returned
    pub fn record(&self, entry: &AttemptLogEntry) {
        match self.append(entry) {
            Ok(()) => debug!("Logged {:?} for attempt {}", entry.user_action, entry.attempt_number),
            Err(e) => warn!("Failed to write attempt log {:?}: {}", self.path, e),
        }
    }

    fn append(&self, entry: &AttemptLogEntry) -> Result<()> {
        let write_header = std::fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer.serialize(entry)?;
        writer.flush()?;

        if write_header {
            tracing::info!("Created attempt log: {:?}", self.path);
        }
        Ok(())
    }

    /// Get log file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
