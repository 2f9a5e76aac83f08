// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Bounded file-tree summary

use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{FileTree, TreeNode};

/// Order entries directories-first, then by case-insensitive name
pub(super) fn compare_entries(a_is_dir: bool, a_name: &str, b_is_dir: bool, b_name: &str) -> Ordering {
    b_is_dir
        .cmp(&a_is_dir)
        .then_with(|| a_name.to_lowercase().cmp(&b_name.to_lowercase()))
        .then_with(|| a_name.cmp(b_name))
}

pub(super) fn build_tree(path: &Path, depth: usize, max_depth: usize) -> FileTree {
    let mut tree = FileTree::new();

    if depth > max_depth {
        tree.insert("...", TreeNode::Entry("max_depth_reached".to_string()));
        return tree;
    }

    let read = match fs::read_dir(path) {
        Ok(read) => read,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            tree.insert("[ACCESS_DENIED]", TreeNode::Entry("permission_error".to_string()));
            return tree;
        }
        Err(e) => {
            debug!("Cannot list {:?}: {}", path, e);
            tree.insert("[UNREADABLE]", TreeNode::Entry("io_error".to_string()));
            return tree;
        }
    };

    let mut entries: Vec<(PathBuf, String, bool)> = read
        .flatten()
        .map(|entry| {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let is_dir = path.is_dir();
            (path, name, is_dir)
        })
        .collect();
    entries.sort_by(|a, b| compare_entries(a.2, &a.1, b.2, &b.1));

    for (child, name, is_dir) in entries {
        if is_dir {
            tree.insert(format!("{}/", name), TreeNode::Dir(build_tree(&child, depth + 1, max_depth)));
        } else {
            tree.insert(name, TreeNode::Entry(describe_file(&child)));
        }
    }

    tree
}

fn describe_file(path: &Path) -> String {
    match fs::metadata(path) {
        Ok(meta) => {
            let ext = path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_else(|| "no_ext".to_string());
            format!("{} | {}", format_file_size(meta.len()), ext)
        }
        Err(_) => "unknown_size".to_string(),
    }
}

/// Human-readable size, one decimal place
pub(super) fn format_file_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.1}{}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1}TB", size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0.0B");
        assert_eq!(format_file_size(1023), "1023.0B");
        assert_eq!(format_file_size(1536), "1.5KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0MB");
    }

    #[test]
    fn test_depth_bound_marks_truncation() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b/c/d/e")).unwrap();

        let tree = build_tree(dir.path(), 0, 3);
        let a = match tree.get("a/") { Some(TreeNode::Dir(t)) => t, other => panic!("{:?}", other) };
        let b = match a.get("b/") { Some(TreeNode::Dir(t)) => t, other => panic!("{:?}", other) };
        let c = match b.get("c/") { Some(TreeNode::Dir(t)) => t, other => panic!("{:?}", other) };
        let d = match c.get("d/") { Some(TreeNode::Dir(t)) => t, other => panic!("{:?}", other) };

        assert_eq!(d.get("..."), Some(&TreeNode::Entry("max_depth_reached".to_string())));
        assert!(d.get("e/").is_none());
    }

    #[test]
    fn test_compare_entries_dirs_first() {
        assert_eq!(compare_entries(true, "zeta", false, "alpha"), Ordering::Less);
        assert_eq!(compare_entries(false, "Beta", false, "alpha"), Ordering::Greater);
        assert_eq!(compare_entries(false, "alpha", false, "Beta"), Ordering::Less);
    }
}
