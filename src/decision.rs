// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! User decisions at the negotiation loop's suspension points

use dialoguer::{Confirm, Input, Select};

use crate::analyzer::ExtractionMode;
use crate::naming::Candidate;
use crate::Result;

/// Answer to "how do you feel about this name?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Retry,
    Cancel,
}

/// What the user is shown for one candidate
#[derive(Debug, Clone)]
pub struct CandidateView<'c> {
    pub candidate: &'c Candidate,
    pub attempt_number: u32,
    /// Retries still available; at zero a retry request force-accepts
    pub retries_left: u32,
    pub extraction_mode: ExtractionMode,
    pub snippet_max_len: usize,
}

/// Source of user decisions; the terminal in production, a script in tests
pub trait DecisionProvider {
    /// Accept, retry or cancel the presented candidate
    fn review(&mut self, view: &CandidateView<'_>) -> Result<Decision>;

    /// Free-text critique of a rejected candidate (may be empty)
    fn feedback(&mut self, candidate: &Candidate) -> Result<String>;

    /// Yes/no consent before a step that touches the filesystem
    fn confirm(&mut self, question: &str, detail: &str) -> Result<bool>;
}

/// Interactive prompts on the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl DecisionProvider for TerminalPrompter {
    fn review(&mut self, view: &CandidateView<'_>) -> Result<Decision> {
        println!("\nGenerated directory name: {}", view.candidate.name);
        if let Some(ref destination) = view.candidate.destination {
            println!("Optimal parent directory: {}", destination.display());
        }
        if view.candidate.fallback {
            println!("(fallback name: the generator was unavailable or its reply was rejected)");
        }
        if view.attempt_number > 1 {
            println!(
                "Analysis focus: {} (snippet length: {} chars)",
                view.extraction_mode.tag(),
                view.snippet_max_len
            );
        }

        let retry_label = if view.retries_left > 0 {
            format!("Try again - {} retries left", view.retries_left)
        } else {
            "Try again - limit reached, the current name will be used".to_string()
        };
        let items = [
            "Accept - I like this name and location".to_string(),
            retry_label,
            "Cancel - leave the directory as it is".to_string(),
        ];

        let choice = Select::new()
            .with_prompt("How do you feel about this directory name and location?")
            .items(&items)
            .default(0)
            .interact()?;

        Ok(match choice {
            0 => Decision::Accept,
            1 => Decision::Retry,
            _ => Decision::Cancel,
        })
    }

    fn feedback(&mut self, candidate: &Candidate) -> Result<String> {
        println!("\nWhat didn't you like about '{}'?", candidate.name);
        if let Some(ref destination) = candidate.destination {
            println!("   or the location '{}'?", destination.display());
        }
        println!("  - Too generic? Suggest more specific terms");
        println!("  - Wrong focus? Say what should be emphasized");
        println!("  - Poor location? Suggest a better parent directory");
        println!("  - Missing context? Say what should be included");
        println!("  - Too long or short? Give a preferred length");
        println!("  - Wrong abbreviations? Suggest alternatives");

        let text: String = Input::new()
            .with_prompt("Your feedback")
            .allow_empty(true)
            .interact_text()?;
        Ok(text)
    }

    fn confirm(&mut self, question: &str, detail: &str) -> Result<bool> {
        println!("\n{}", question);
        if !detail.is_empty() {
            println!("  {}", detail);
        }
        Ok(Confirm::new()
            .with_prompt("Proceed?")
            .default(false)
            .interact()?)
    }
}
