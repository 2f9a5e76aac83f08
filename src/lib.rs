// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Sortscribe: content-aware directory naming and placement
//!
//! Analyzes a directory, asks a language model for a camelCase name built
//! from a fixed abbreviation taxonomy, lets the user accept or critique it,
//! and moves the directory into the matching branch of a DATA-HOME tree.

pub mod analyzer;
pub mod attempt_log;
pub mod audio;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod naming;
pub mod negotiation;
pub mod organizer;
pub mod placement;
pub mod taxonomy;

#[cfg(test)]
mod testing;

pub use config::AppConfig;
pub use error::{Result, ScribeError};
