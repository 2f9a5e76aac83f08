// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Directory content analysis
//!
//! Builds the bounded file-tree summary and text snippets that the naming
//! prompt is assembled from. A payload is never edited after it is built;
//! retries build a fresh one in end-extraction mode.

mod snippets;
mod tree;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::{Result, ScribeError};

/// Which end of each file snippets are taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExtractionMode {
    #[serde(rename = "beginning_of_files")]
    Start,
    #[serde(rename = "end_of_files")]
    End,
}

impl ExtractionMode {
    /// Tag prefixed to every snippet
    pub fn tag(&self) -> &'static str {
        match self {
            ExtractionMode::Start => "beginning",
            ExtractionMode::End => "end",
        }
    }
}

/// String-keyed map that serializes in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.0.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A node in the file tree: either a leaf descriptor or a nested directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// `"<size> | <ext>"`, `"unknown_size"`, or a sentinel marker
    Entry(String),
    Dir(FileTree),
}

pub type FileTree = OrderedMap<TreeNode>;

/// Limits and mode the payload was built with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisMetadata {
    pub files_analyzed: usize,
    pub extraction_mode: ExtractionMode,
    pub snippet_max_len: usize,
    pub lines_per_file: usize,
    pub max_depth: usize,
}

/// Everything the naming prompt knows about a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisPayload {
    pub directory_path: String,
    pub file_tree: FileTree,
    pub text_snippets: OrderedMap<String>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisPayload {
    /// Write the payload as pretty JSON (debugging aid)
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!("Analysis payload saved to {:?}", path);
        Ok(())
    }
}

/// Builds [`AnalysisPayload`]s for a directory
#[derive(Debug, Clone)]
pub struct ContentAnalyzer {
    limits: AnalysisConfig,
}

impl ContentAnalyzer {
    pub fn new(limits: AnalysisConfig) -> Self {
        Self { limits }
    }

    /// Analyze `directory`, taking snippets from the end selected by `mode`
    pub fn analyze(&self, directory: &Path, mode: ExtractionMode) -> Result<AnalysisPayload> {
        if !directory.is_dir() {
            return Err(ScribeError::DirectoryNotFound(directory.to_path_buf()));
        }

        info!("Analyzing directory {:?} ({})", directory, mode.tag());

        let file_tree = tree::build_tree(directory, 0, self.limits.max_depth);
        let text_snippets = snippets::extract_snippets(directory, mode, &self.limits);

        debug!("Extracted {} snippets", text_snippets.len());

        Ok(AnalysisPayload {
            directory_path: directory.to_string_lossy().to_string(),
            file_tree,
            metadata: AnalysisMetadata {
                files_analyzed: text_snippets.len(),
                extraction_mode: mode,
                snippet_max_len: self.limits.snippet_max_len,
                lines_per_file: self.limits.lines_per_file,
                max_depth: self.limits.max_depth,
            },
            text_snippets,
        })
    }
}

impl Default for ContentAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}
