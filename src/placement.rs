// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Conflict-free placement and directory moves
//!
//! Resolution is check-then-act with no locking: callers re-resolve right
//! before moving, and a concurrent writer can still win the race.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{Result, ScribeError};

/// Highest numeric suffix tried before giving up
pub const MAX_SUFFIX: u32 = 10_000;

/// A free name/path pair under a parent directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub final_name: String,
    pub final_path: PathBuf,
}

impl Placement {
    /// True when a suffix had to be appended to `base`
    pub fn is_suffixed(&self, base: &str) -> bool {
        self.final_name != base
    }
}

/// Finds a free name by appending 1, 2, 3, ... to the base name
#[derive(Debug, Clone, Copy)]
pub struct PlacementResolver {
    max_suffix: u32,
}

impl PlacementResolver {
    pub fn new() -> Self {
        Self { max_suffix: MAX_SUFFIX }
    }

    pub fn with_max_suffix(max_suffix: u32) -> Self {
        Self { max_suffix }
    }

    /// Resolve `name` under `parent` to a path that does not exist yet
    pub fn resolve(&self, name: &str, parent: &Path) -> Result<Placement> {
        let candidate = parent.join(name);
        if !exists(&candidate) {
            return Ok(Placement { final_name: name.to_string(), final_path: candidate });
        }

        for n in 1..=self.max_suffix {
            let suffixed = format!("{}{}", name, n);
            let path = parent.join(&suffixed);
            if !exists(&path) {
                debug!("Resolved conflict for {} as {}", name, suffixed);
                return Ok(Placement { final_name: suffixed, final_path: path });
            }
        }

        Err(ScribeError::PlacementConflict {
            base: name.to_string(),
            attempts: self.max_suffix,
        })
    }
}

impl Default for PlacementResolver {
    fn default() -> Self {
        Self::new()
    }
}

// Broken symlinks count as occupied.
fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Move a directory, falling back to copy + remove across filesystems
pub fn move_directory(from: &Path, to: &Path) -> io::Result<()> {
    if exists(to) {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", to.display()),
        ));
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if !is_cross_device(&e) => Err(e),
        Err(e) => {
            debug!("rename {:?} -> {:?} crosses devices ({}); copying instead", from, to, e);
            copy_across(from, to, |path| fs::remove_dir_all(path))
        }
    }
}

/// Copy `from` to `to`, then drop the source with `remove_source`.
///
/// Once the copy is complete the move has happened: a source that cannot be
/// removed is left behind with a warning. A failed copy removes its partial
/// destination and leaves the source untouched.
fn copy_across<F>(from: &Path, to: &Path, remove_source: F) -> io::Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    if let Err(copy_err) = copy_tree(from, to) {
        if let Err(cleanup) = fs::remove_dir_all(to) {
            warn!("Could not remove partial copy at {:?}: {}", to, cleanup);
        }
        return Err(copy_err);
    }

    if let Err(e) = remove_source(from) {
        warn!("Copied {:?} to {:?} but could not remove the source: {}", from, to, e);
    }
    Ok(())
}

fn is_cross_device(e: &io::Error) -> bool {
    #[cfg(unix)]
    const EXDEV: i32 = 18;
    #[cfg(windows)]
    const EXDEV: i32 = 17; // ERROR_NOT_SAME_DEVICE
    #[cfg(not(any(unix, windows)))]
    const EXDEV: i32 = -1;

    e.raw_os_error() == Some(EXDEV)
}

/// Rename a directory in place (same parent)
pub fn rename_directory(from: &Path, to: &Path) -> io::Result<()> {
    if exists(to) {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", to.display()),
        ));
    }
    fs::rename(from, to)
}

fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
