// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Directory name generation
//!
//! [`NamingClient`] turns an analysis payload (plus any accumulated user
//! feedback) into a [`Candidate`]. Every failure path ends in a synthetic
//! fallback name, so naming never stalls the pipeline.

pub mod prompt;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::analyzer::AnalysisPayload;
use crate::config::EngineConfig;
use crate::engine::{generate_with_retry, GenerationRequest, TextGenerator};
use crate::taxonomy::NamingTaxonomy;

/// Longest name the validator accepts
pub const MAX_NAME_LEN: usize = 75;

/// Content-type stub used by fallback names
pub const FALLBACK_STUB: &str = "processedAudio";

/// Separator used when joining feedback history into one directive
pub const FEEDBACK_SEPARATOR: &str = " | ";

/// A proposed name, not yet committed to the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    /// Routed DATA-HOME parent, when integration is active
    pub destination: Option<PathBuf>,
    /// The name passed [`validate`]
    pub validated: bool,
    /// The name came from the fallback scheme rather than the model
    pub fallback: bool,
}

impl Candidate {
    pub fn generated(name: String) -> Self {
        Self { name, destination: None, validated: true, fallback: false }
    }

    pub fn fallback(name: String) -> Self {
        let validated = validate(&name);
        Self { name, destination: None, validated, fallback: true }
    }

    /// Same candidate, placed under `destination`
    pub fn with_destination(self, destination: Option<PathBuf>) -> Self {
        Self { destination, ..self }
    }
}

/// True iff `name` is at most 75 characters and matches `^[a-z][a-zA-Z0-9]*$`
pub fn validate(name: &str) -> bool {
    let mut chars = name.chars();
    let first_ok = matches!(chars.next(), Some(c) if c.is_ascii_lowercase());
    first_ok
        && name.chars().count() <= MAX_NAME_LEN
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Synthetic name for `date`, e.g. `processedAudio20250314`
pub fn fallback_name(date: NaiveDate) -> String {
    format!("{}{}", FALLBACK_STUB, date.format("%Y%m%d"))
}

/// Source of candidates for the negotiation loop
#[async_trait]
pub trait NameProposer: Send + Sync {
    /// Propose a name for `payload`, taking every earlier complaint into account
    async fn propose(&self, payload: &AnalysisPayload, feedback: &[String]) -> Candidate;
}

/// Prompts the configured generator and validates its reply
pub struct NamingClient<'a> {
    taxonomy: &'a NamingTaxonomy,
    generator: Option<Box<dyn TextGenerator>>,
    max_tokens: u32,
    temperature: f32,
    retries: u32,
}

impl<'a> NamingClient<'a> {
    pub fn new(
        taxonomy: &'a NamingTaxonomy,
        generator: Option<Box<dyn TextGenerator>>,
        engine: &EngineConfig,
    ) -> Self {
        Self {
            taxonomy,
            generator,
            max_tokens: engine.max_output_tokens,
            temperature: engine.temperature,
            retries: engine.retries,
        }
    }

    fn fallback(&self, reason: &str) -> Candidate {
        let name = fallback_name(Local::now().date_naive());
        warn!("{}; using fallback name {}", reason, name);
        Candidate::fallback(name)
    }
}

#[async_trait]
impl<'a> NameProposer for NamingClient<'a> {
    async fn propose(&self, payload: &AnalysisPayload, feedback: &[String]) -> Candidate {
        let generator = match &self.generator {
            Some(g) => g,
            None => return self.fallback("No generation backend configured"),
        };

        let joined = feedback.join(FEEDBACK_SEPARATOR);
        let feedback = (!feedback.is_empty()).then_some(joined.as_str());

        let prompt = match prompt::build_prompt(self.taxonomy, payload, feedback) {
            Ok(p) => p,
            Err(e) => return self.fallback(&format!("Failed to build prompt: {}", e)),
        };

        let request = GenerationRequest {
            system: prompt::SYSTEM_INSTRUCTION.to_string(),
            prompt,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let reply = match generate_with_retry(generator.as_ref(), &request, self.retries).await {
            Ok(r) => r,
            Err(e) => return self.fallback(&format!("Generation failed: {}", e)),
        };

        let name = reply.trim().to_string();
        debug!("Raw reply: {:?}", reply);

        if validate(&name) {
            info!("Generated name: {}", name);
            Candidate::generated(name)
        } else {
            self.fallback(&format!("Reply {:?} failed validation", name))
        }
    }
}
