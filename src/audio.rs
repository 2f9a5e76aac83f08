// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Audio detection and transcript staging
//!
//! Audio files at the top of a directory are transcribed and gathered, with
//! their transcripts, into a `transcribed_audio/` subdirectory. That
//! subdirectory is what gets named and placed afterwards.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{Result, ScribeError};

/// Lowercase extensions treated as audio
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "flac", "aac", "ogg", "wma"];

/// Name of the staging subdirectory
pub const STAGING_DIR: &str = "transcribed_audio";

/// True when `path` has an audio extension (case-insensitive)
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Audio files directly inside `directory`, sorted by name
pub fn detect_audio_files(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(ScribeError::DirectoryNotFound(directory.to_path_buf()));
    }

    let mut found: Vec<PathBuf> = fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_audio_file(path))
        .collect();
    found.sort();

    debug!("Found {} audio files in {:?}", found.len(), directory);
    Ok(found)
}

/// Speech-to-text backend
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcript text for `audio_file`
    async fn transcribe(&self, audio_file: &Path) -> Result<String>;
}

/// Client for an OpenAI-compatible `/v1/audio/transcriptions` endpoint
pub struct WhisperClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl WhisperClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, audio_file: &Path) -> Result<String> {
        let url = format!("{}/v1/audio/transcriptions", self.base_url);
        let bytes = tokio::fs::read(audio_file).await?;
        let file_name = audio_file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());

        let form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .part("file", Part::bytes(bytes).file_name(file_name));

        debug!("Transcribing {:?} via {}", audio_file, url);

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ScribeError::Transcription(format!(
                "Transcription service returned status {}: {}",
                status, detail
            )));
        }

        let result: TranscriptionResponse = response.json().await?;
        Ok(result.text)
    }
}

/// Transcript file name for `audio_file`: `<stem>_transcript.txt`
pub fn transcript_name(audio_file: &Path) -> String {
    let stem = audio_file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{}_transcript.txt", stem)
}

/// Transcribe `files` and move them with their transcripts into
/// `<directory>/transcribed_audio/`; returns that subdirectory.
///
/// A failed or empty transcription is skipped; the audio file still moves.
pub async fn stage_audio<T>(directory: &Path, files: &[PathBuf], transcriber: &T) -> Result<PathBuf>
where
    T: Transcriber + ?Sized,
{
    let staging = directory.join(STAGING_DIR);
    fs::create_dir_all(&staging)?;
    info!("Staging {} audio files in {:?}", files.len(), staging);

    for file in files {
        match transcriber.transcribe(file).await {
            Ok(text) if !text.trim().is_empty() => {
                let transcript = staging.join(transcript_name(file));
                fs::write(&transcript, text)?;
                info!("Saved transcription: {:?}", transcript);
            }
            Ok(_) => warn!("Empty transcription for {:?}", file),
            Err(e) => warn!("Error transcribing {:?}: {}", file, e),
        }

        if let Some(name) = file.file_name() {
            fs::rename(file, staging.join(name))?;
        }
    }

    Ok(staging)
}
