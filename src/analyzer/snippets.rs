// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Text snippet extraction from readable files

use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use super::tree::compare_entries;
use super::{ExtractionMode, OrderedMap};
use crate::config::AnalysisConfig;

pub(super) fn extract_snippets(
    root: &Path,
    mode: ExtractionMode,
    limits: &AnalysisConfig,
) -> OrderedMap<String> {
    let mut snippets = OrderedMap::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by(|a, b| {
            compare_entries(
                a.file_type().is_dir(),
                &a.file_name().to_string_lossy(),
                b.file_type().is_dir(),
                &b.file_name().to_string_lossy(),
            )
        });

    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if snippets.len() >= limits.max_files {
            break;
        }
        if !entry.file_type().is_file() || !is_readable(entry.path(), limits) {
            continue;
        }

        let bytes = match std::fs::read(entry.path()) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Skipping unreadable {:?}: {}", entry.path(), e);
                continue;
            }
        };
        let content = String::from_utf8_lossy(&bytes);

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let text = excerpt(&content, mode, limits.lines_per_file, limits.snippet_max_len);
        snippets.insert(
            relative.to_string_lossy().to_string(),
            format!("[{}] {}", mode.tag(), text),
        );
    }

    snippets
}

fn is_readable(path: &Path, limits: &AnalysisConfig) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| limits.readable_extensions.iter().any(|r| r.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// First or last `lines` lines, then first or last `max_chars` characters
pub(super) fn excerpt(content: &str, mode: ExtractionMode, lines: usize, max_chars: usize) -> String {
    let all: Vec<&str> = content.split('\n').collect();

    match mode {
        ExtractionMode::Start => {
            let end = all.len().min(lines);
            all[..end].join("\n").chars().take(max_chars).collect()
        }
        ExtractionMode::End => {
            let start = all.len().saturating_sub(lines);
            let joined = all[start..].join("\n");
            let skip = joined.chars().count().saturating_sub(max_chars);
            joined.chars().skip(skip).collect()
        }
    }
}
