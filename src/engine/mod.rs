// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Text generation backends

pub mod anthropic;
pub mod ollama;

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{EngineConfig, Provider};
use crate::{Result, ScribeError};

pub use anthropic::AnthropicClient;
pub use ollama::OllamaClient;

/// One generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Anything that can turn a prompt into a single text reply
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Generate a completion for `request`
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Build the configured backend.
///
/// Returns `Ok(None)` when the backend needs a credential that is missing;
/// callers then fall back to synthetic names.
pub fn build_generator(config: &EngineConfig) -> Result<Option<Box<dyn TextGenerator>>> {
    let timeout = Duration::from_secs(config.timeout_secs);

    match config.provider {
        Provider::Anthropic => match config.api_key.as_deref() {
            Some(key) => {
                info!("Using Anthropic model {}", config.model);
                Ok(Some(Box::new(AnthropicClient::new(&config.url, key, &config.model, timeout)?)))
            }
            None => {
                warn!("ANTHROPIC_API_KEY not set; names will use the fallback scheme");
                Ok(None)
            }
        },
        Provider::Ollama => {
            info!("Using Ollama model {} at {}", config.model, config.url);
            Ok(Some(Box::new(OllamaClient::new(&config.url, &config.model, timeout)?)))
        }
    }
}

/// Map a non-success HTTP status to an error.
///
/// Server errors and rate limiting mean the backend is unavailable for now;
/// anything else is a rejected request.
pub(crate) fn status_error(backend: &str, status: reqwest::StatusCode, detail: &str) -> ScribeError {
    let message = if detail.is_empty() {
        format!("{} returned status {}", backend, status)
    } else {
        format!("{} returned status {}: {}", backend, status, detail)
    };

    if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        ScribeError::GeneratorUnavailable(message)
    } else {
        ScribeError::Generation(message)
    }
}

/// True for failures worth another attempt: timeouts, refused connections
/// and an unavailable backend
pub fn is_transient(error: &ScribeError) -> bool {
    match error {
        ScribeError::Api(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ScribeError::GeneratorUnavailable(_) => true,
        _ => false,
    }
}

/// Generate with bounded retries and exponential backoff (1s, 2s, 4s, ...).
///
/// Only transient failures are retried; any other error returns at once.
pub async fn generate_with_retry(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
    retries: u32,
) -> Result<String> {
    generate_with_backoff(generator, request, retries, Duration::from_secs(1)).await
}

async fn generate_with_backoff(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
    retries: u32,
    base_delay: Duration,
) -> Result<String> {
    let mut last_error = None;

    for attempt in 0..=retries {
        if attempt > 0 {
            let delay = base_delay * 2u32.pow(attempt - 1);
            warn!("Retrying {} request in {:?} (attempt {})", generator.name(), delay, attempt + 1);
            tokio::time::sleep(delay).await;
        }

        match generator.generate(request).await {
            Ok(response) => return Ok(response),
            Err(e) if is_transient(&e) => {
                warn!("{} request failed: {}", generator.name(), e);
                last_error = Some(e);
            }
            Err(e) => {
                warn!("{} request rejected: {}", generator.name(), e);
                return Err(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        ScribeError::Generation("Unknown error".to_string())
    }))
}
