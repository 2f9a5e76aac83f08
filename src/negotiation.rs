// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Retry/feedback state machine for directory naming
//!
//! ```text
//! INIT -> GENERATED -> ACCEPTED | RETRYING | LIMIT_REACHED | CANCELLED | FAILED
//!             ^            |
//!             +------------+
//! ```
//!
//! Every decision point traversed writes exactly one attempt-log row.
//! Retries rebuild the analysis from the end of each file and pass the whole
//! feedback history to the proposer.

use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::analyzer::{AnalysisPayload, ContentAnalyzer, ExtractionMode};
use crate::attempt_log::{AttemptLogEntry, AttemptLogger, SessionContext, UserAction};
use crate::decision::{CandidateView, Decision, DecisionProvider};
use crate::naming::{Candidate, NameProposer};
use crate::taxonomy::TaxonomyRouter;
use crate::Result;

/// Substituted when the user rejects a name without saying why
pub const DEFAULT_FEEDBACK: &str = "Please make the name more specific and descriptive";

/// Time-derived id, unique per run: `YYYYMMDD_HHMMSS_<8 hex>`
pub fn generate_session_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}", Local::now().format("%Y%m%d_%H%M%S"), &suffix[..8])
}

/// State of one negotiation, alive until the loop terminates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    /// Retries taken so far; never exceeds `retry_limit`
    pub attempt_count: u32,
    pub retry_limit: u32,
    pub feedback_history: Vec<String>,
}

impl Session {
    pub fn new(retry_limit: u32) -> Self {
        Self::with_id(generate_session_id(), retry_limit)
    }

    pub fn with_id(session_id: String, retry_limit: u32) -> Self {
        Self {
            session_id,
            attempt_count: 0,
            retry_limit,
            feedback_history: Vec::new(),
        }
    }

    pub fn can_retry(&self) -> bool {
        self.attempt_count < self.retry_limit
    }

    /// 1-based number of the current generation attempt
    pub fn attempt_number(&self) -> u32 {
        self.attempt_count + 1
    }

    pub fn retries_left(&self) -> u32 {
        self.retry_limit.saturating_sub(self.attempt_count)
    }
}

/// How the loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The user accepted the candidate
    Accepted(Candidate),
    /// A retry was requested at the limit; the current candidate stands
    LimitReached(Candidate),
    Cancelled,
    /// The proposer produced no name
    Failed,
}

impl Resolution {
    /// The candidate to place, if any
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            Resolution::Accepted(c) | Resolution::LimitReached(c) => Some(c),
            Resolution::Cancelled | Resolution::Failed => None,
        }
    }
}

/// Result of a finished negotiation
#[derive(Debug, Clone)]
pub struct NegotiationOutcome {
    pub session: Session,
    pub resolution: Resolution,
    /// Row context for any follow-up log entries (placement)
    pub context: SessionContext,
}

/// The directory being named
#[derive(Debug, Clone)]
pub struct NegotiationTarget {
    /// Directory that is analyzed (and later moved)
    pub directory: PathBuf,
    /// Directory the user pointed at; drives source-based routing
    pub source_path: PathBuf,
    pub has_audio_files: bool,
}

enum State {
    Generated(Candidate),
    Retrying(Candidate),
    Done(Resolution),
}

/// Drives one naming session to a terminal state
pub struct NegotiationLoop<'a, P: ?Sized, D: ?Sized> {
    analyzer: &'a ContentAnalyzer,
    proposer: &'a P,
    router: TaxonomyRouter<'a>,
    logger: &'a AttemptLogger,
    decisions: &'a mut D,
    retry_limit: u32,
    data_home: Option<&'a Path>,
    payload_dir: Option<&'a Path>,
}

impl<'a, P, D> NegotiationLoop<'a, P, D>
where
    P: NameProposer + ?Sized,
    D: DecisionProvider + ?Sized,
{
    pub fn new(
        analyzer: &'a ContentAnalyzer,
        proposer: &'a P,
        router: TaxonomyRouter<'a>,
        logger: &'a AttemptLogger,
        decisions: &'a mut D,
        retry_limit: u32,
    ) -> Self {
        Self {
            analyzer,
            proposer,
            router,
            logger,
            decisions,
            retry_limit,
            data_home: None,
            payload_dir: None,
        }
    }

    /// Route candidates under this DATA-HOME root
    pub fn with_data_home(mut self, data_home: Option<&'a Path>) -> Self {
        self.data_home = data_home;
        self
    }

    /// Save every payload built as JSON in this directory
    pub fn with_payload_dir(mut self, dir: Option<&'a Path>) -> Self {
        self.payload_dir = dir;
        self
    }

    /// Run until accept, cancel, limit or failure
    pub async fn run(self, target: &NegotiationTarget) -> Result<NegotiationOutcome> {
        let session = Session::new(self.retry_limit);
        self.run_session(target, session).await
    }

    pub async fn run_session(
        self,
        target: &NegotiationTarget,
        mut session: Session,
    ) -> Result<NegotiationOutcome> {
        // INIT
        let payload = self.analyzer.analyze(&target.directory, ExtractionMode::Start)?;
        self.save_payload(&payload, "analysis_data.json");

        let context = SessionContext {
            session_id: session.session_id.clone(),
            source_path: target.source_path.clone(),
            files_analyzed: payload.metadata.files_analyzed,
            has_audio_files: target.has_audio_files,
        };
        info!(
            "Session {}: {} files analyzed in {:?}",
            session.session_id, context.files_analyzed, target.directory
        );

        let mut mode = payload.metadata.extraction_mode;
        let mut state = State::Generated(self.generate(&payload, &session, target).await);

        let resolution = loop {
            debug_assert!(session.attempt_count <= session.retry_limit);

            state = match state {
                State::Generated(candidate) => {
                    if candidate.name.is_empty() {
                        warn!("Failed to generate directory name");
                        self.log(&context, &session, &candidate, UserAction::GenerationFailed, "");
                        State::Done(Resolution::Failed)
                    } else {
                        let view = CandidateView {
                            candidate: &candidate,
                            attempt_number: session.attempt_number(),
                            retries_left: session.retries_left(),
                            extraction_mode: mode,
                            snippet_max_len: payload.metadata.snippet_max_len,
                        };
                        match self.decisions.review(&view)? {
                            Decision::Accept => {
                                self.log(&context, &session, &candidate, UserAction::Accept, "");
                                State::Done(Resolution::Accepted(candidate))
                            }
                            Decision::Retry if session.can_retry() => State::Retrying(candidate),
                            Decision::Retry => {
                                info!(
                                    "Maximum retry attempts ({}) reached; using {}",
                                    session.retry_limit, candidate.name
                                );
                                self.log(&context, &session, &candidate, UserAction::MaxRetriesReached, "");
                                State::Done(Resolution::LimitReached(candidate))
                            }
                            Decision::Cancel => {
                                self.log(&context, &session, &candidate, UserAction::Cancel, "");
                                State::Done(Resolution::Cancelled)
                            }
                        }
                    }
                }
                State::Retrying(rejected) => {
                    let raw = self.decisions.feedback(&rejected)?;
                    let feedback = match raw.trim() {
                        "" => DEFAULT_FEEDBACK.to_string(),
                        text => text.to_string(),
                    };
                    session.feedback_history.push(feedback.clone());
                    self.log(&context, &session, &rejected, UserAction::Retry, &feedback);
                    session.attempt_count += 1;

                    info!(
                        "Retry attempt {}/{}: re-analyzing from the end of each file",
                        session.attempt_count, session.retry_limit
                    );
                    let retry_payload = self.analyzer.analyze(&target.directory, ExtractionMode::End)?;
                    self.save_payload(
                        &retry_payload,
                        &format!("retry_analysis_data_{}.json", session.attempt_count),
                    );
                    mode = retry_payload.metadata.extraction_mode;

                    State::Generated(self.generate(&retry_payload, &session, target).await)
                }
                State::Done(resolution) => break resolution,
            };
        };

        Ok(NegotiationOutcome { session, resolution, context })
    }

    async fn generate(&self, payload: &AnalysisPayload, session: &Session, target: &NegotiationTarget) -> Candidate {
        let candidate = self.proposer.propose(payload, &session.feedback_history).await;
        let destination = match self.data_home {
            Some(root) if !candidate.name.is_empty() => {
                Some(self.router.route(&candidate.name, root, Some(&target.source_path)))
            }
            _ => None,
        };
        debug!("Attempt {} candidate {:?} -> {:?}", session.attempt_number(), candidate.name, destination);
        candidate.with_destination(destination)
    }

    fn log(
        &self,
        context: &SessionContext,
        session: &Session,
        candidate: &Candidate,
        action: UserAction,
        feedback: &str,
    ) {
        let parent = candidate
            .destination
            .as_ref()
            .map(|d| d.to_string_lossy().to_string())
            .unwrap_or_default();
        let entry = AttemptLogEntry::new(context, session.attempt_number(), action)
            .with_name(&candidate.name)
            .with_parent(parent)
            .with_feedback(feedback);
        self.logger.record(&entry);
    }

    fn save_payload(&self, payload: &AnalysisPayload, file_name: &str) {
        if let Some(dir) = self.payload_dir {
            if let Err(e) = payload.save(&dir.join(file_name)) {
                warn!("Could not save analysis payload: {}", e);
            }
        }
    }
}
