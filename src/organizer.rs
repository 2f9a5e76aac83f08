// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! End-to-end pipeline: stage audio, negotiate a name, place the directory

use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::analyzer::ContentAnalyzer;
use crate::attempt_log::{AttemptLogEntry, AttemptLogger, SessionContext, UserAction};
use crate::audio::{detect_audio_files, stage_audio, Transcriber};
use crate::config::AppConfig;
use crate::decision::DecisionProvider;
use crate::naming::{Candidate, NameProposer};
use crate::negotiation::{NegotiationLoop, NegotiationOutcome, NegotiationTarget};
use crate::placement::{move_directory, rename_directory, Placement, PlacementResolver};
use crate::taxonomy::{NamingTaxonomy, TaxonomyRouter};
use crate::{Result, ScribeError};

/// `optimal_parent_path` recorded for the local rename after a failed move
pub const LOCAL_FALLBACK_PARENT: &str = "local_fallback";

/// `optimal_parent_path` recorded when DATA-HOME routing is inactive
pub const NO_DATA_HOME_PARENT: &str = "no_data_home";

/// Per-run switches
#[derive(Debug, Clone, Default)]
pub struct OrganizeOptions {
    /// Preview placement without touching the filesystem
    pub dry_run: bool,
    /// Directory receiving every analysis payload as JSON
    pub save_analysis: Option<PathBuf>,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The user declined analysis
    Skipped,
    /// Negotiation ended without a name (cancel or generation failure)
    Unnamed,
    /// The user declined the move/rename
    Declined,
    /// Dry run: placement was only previewed
    Planned,
    /// Moved under DATA-HOME
    Moved,
    /// Renamed next to where it was
    RenamedLocally,
    /// Every placement strategy failed; the directory stayed put
    Failed,
}

/// Summary printed at the end of a run
#[derive(Debug, Clone)]
pub struct OrganizeReport {
    pub disposition: Disposition,
    pub final_location: PathBuf,
    /// Where the directory would go (dry run) or went
    pub planned: Option<PathBuf>,
    pub data_home_relative: Option<PathBuf>,
    pub session_id: Option<String>,
    pub attempts: u32,
    pub feedback_count: usize,
}

impl OrganizeReport {
    fn unchanged(disposition: Disposition, location: &Path) -> Self {
        Self {
            disposition,
            final_location: location.to_path_buf(),
            planned: None,
            data_home_relative: None,
            session_id: None,
            attempts: 0,
            feedback_count: 0,
        }
    }
}

/// Runs the whole pipeline for one directory
pub struct Organizer<'a, D: ?Sized> {
    config: &'a AppConfig,
    taxonomy: &'a NamingTaxonomy,
    proposer: &'a dyn NameProposer,
    transcriber: Option<&'a dyn Transcriber>,
    logger: &'a AttemptLogger,
    decisions: &'a mut D,
    data_home: Option<PathBuf>,
    resolver: PlacementResolver,
    options: OrganizeOptions,
}

impl<'a, D> Organizer<'a, D>
where
    D: DecisionProvider + ?Sized,
{
    pub fn new(
        config: &'a AppConfig,
        taxonomy: &'a NamingTaxonomy,
        proposer: &'a dyn NameProposer,
        logger: &'a AttemptLogger,
        decisions: &'a mut D,
    ) -> Self {
        Self {
            config,
            taxonomy,
            proposer,
            transcriber: None,
            logger,
            decisions,
            data_home: None,
            resolver: PlacementResolver::new(),
            options: OrganizeOptions::default(),
        }
    }

    /// Validated DATA-HOME root; `None` disables routing
    pub fn with_data_home(mut self, data_home: Option<PathBuf>) -> Self {
        self.data_home = data_home;
        self
    }

    /// Enable audio staging through `transcriber`
    pub fn with_transcriber(mut self, transcriber: Option<&'a dyn Transcriber>) -> Self {
        self.transcriber = transcriber;
        self
    }

    pub fn with_options(mut self, options: OrganizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Organize `directory`
    pub async fn run(&mut self, directory: &Path) -> Result<OrganizeReport> {
        if !directory.is_dir() {
            return Err(ScribeError::DirectoryNotFound(directory.to_path_buf()));
        }
        // Routing reads the source path and moves need a real parent, so
        // `.`, `..` and symlinks are resolved first.
        let directory = std::fs::canonicalize(directory)?;
        let directory = directory.as_path();

        let staged = self.stage(directory).await?;
        let (target_dir, question) = match staged {
            Some(ref dir) => (
                dir.clone(),
                "Would you like to proceed with directory analysis and naming?",
            ),
            None => (
                directory.to_path_buf(),
                "Would you like to analyze and organize this directory?",
            ),
        };

        let proceed = self.decisions.confirm(
            question,
            "This will analyze the directory structure and content to generate a name and placement.",
        )?;
        if !proceed {
            info!("Directory analysis cancelled by user");
            return Ok(OrganizeReport::unchanged(Disposition::Skipped, &target_dir));
        }

        let target = NegotiationTarget {
            directory: target_dir.clone(),
            source_path: directory.to_path_buf(),
            has_audio_files: staged.is_some(),
        };
        let outcome = self.negotiate(&target).await?;

        let mut report = OrganizeReport {
            disposition: Disposition::Unnamed,
            final_location: target_dir.clone(),
            planned: None,
            data_home_relative: None,
            session_id: Some(outcome.session.session_id.clone()),
            attempts: outcome.session.attempt_number(),
            feedback_count: outcome.session.feedback_history.len(),
        };

        let candidate = match outcome.resolution.candidate() {
            Some(c) => c.clone(),
            None => return Ok(report),
        };

        let attempt_number = outcome.session.attempt_number();
        let (disposition, location, planned) = match (self.data_home.clone(), candidate.destination.clone()) {
            (Some(_), Some(parent)) => {
                self.place_in_data_home(&target_dir, &candidate, &parent, &outcome.context, attempt_number)?
            }
            _ => self.rename_in_place(&target_dir, &candidate, &outcome.context, attempt_number)?,
        };

        report.disposition = disposition;
        report.final_location = location;
        report.planned = planned;
        if disposition == Disposition::Moved {
            if let Some(ref root) = self.data_home {
                report.data_home_relative = report.final_location.strip_prefix(root).ok().map(Path::to_path_buf);
            }
        }
        Ok(report)
    }

    async fn stage(&mut self, directory: &Path) -> Result<Option<PathBuf>> {
        let transcriber = match self.transcriber {
            Some(t) => t,
            None => return Ok(None),
        };

        let audio = detect_audio_files(directory)?;
        if audio.is_empty() {
            info!("No audio files found in {:?}", directory);
            return Ok(None);
        }

        let listing = audio
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let question = format!("Found {} audio files. Run transcription on them?", audio.len());
        if !self.decisions.confirm(&question, &listing)? {
            return Ok(None);
        }

        if self.options.dry_run {
            info!("Dry run: skipping audio staging");
            return Ok(None);
        }

        stage_audio(directory, &audio, transcriber).await.map(Some)
    }

    async fn negotiate(&mut self, target: &NegotiationTarget) -> Result<NegotiationOutcome> {
        let analyzer = ContentAnalyzer::new(self.config.analysis.clone());
        NegotiationLoop::new(
            &analyzer,
            self.proposer,
            TaxonomyRouter::new(self.taxonomy),
            self.logger,
            &mut *self.decisions,
            self.config.negotiation.retry_limit,
        )
        .with_data_home(self.data_home.as_deref())
        .with_payload_dir(self.options.save_analysis.as_deref())
        .run(target)
        .await
    }

    fn place_in_data_home(
        &mut self,
        target_dir: &Path,
        candidate: &Candidate,
        parent: &Path,
        ctx: &SessionContext,
        attempt_number: u32,
    ) -> Result<(Disposition, PathBuf, Option<PathBuf>)> {
        let preview = self.resolver.resolve(&candidate.name, parent)?;
        let detail = describe(target_dir, &preview, &candidate.name, "move");

        if self.options.dry_run {
            info!("Dry run: {}", detail);
            return Ok((Disposition::Planned, target_dir.to_path_buf(), Some(preview.final_path)));
        }

        if !self.decisions.confirm("Would you like to move and rename the directory?", &detail)? {
            info!("Directory move cancelled by user");
            return Ok((Disposition::Declined, target_dir.to_path_buf(), None));
        }

        let parent_display = parent.to_string_lossy().to_string();
        match self.move_into(target_dir, &candidate.name, parent) {
            Ok(placement) => {
                info!("Directory moved to {:?}", placement.final_path);
                self.logger.record(
                    &AttemptLogEntry::new(ctx, attempt_number, UserAction::MovedSuccessfully)
                        .with_name(&placement.final_name)
                        .with_parent(&parent_display)
                        .with_destination(&placement.final_path),
                );
                let destination = placement.final_path.clone();
                Ok((Disposition::Moved, placement.final_path, Some(destination)))
            }
            Err(e) => {
                error!("Error moving directory to {:?}: {}", parent, e);
                warn!("Falling back to local rename");
                self.logger.record(
                    &AttemptLogEntry::new(ctx, attempt_number, UserAction::MoveFailed)
                        .with_name(&preview.final_name)
                        .with_parent(&parent_display)
                        .with_feedback(&format!("Move error: {}", e)),
                );
                Ok(self.local_rename(target_dir, candidate, ctx, attempt_number, LOCAL_FALLBACK_PARENT))
            }
        }
    }

    /// Create `parent`, re-resolve the name against it, then move
    fn move_into(&self, target_dir: &Path, name: &str, parent: &Path) -> Result<Placement> {
        std::fs::create_dir_all(parent)?;
        let placement = self.resolver.resolve(name, parent)?;
        move_directory(target_dir, &placement.final_path)?;
        Ok(placement)
    }

    fn rename_in_place(
        &mut self,
        target_dir: &Path,
        candidate: &Candidate,
        ctx: &SessionContext,
        attempt_number: u32,
    ) -> Result<(Disposition, PathBuf, Option<PathBuf>)> {
        let parent = local_parent(target_dir);
        let preview = self.resolver.resolve(&candidate.name, &parent)?;
        let detail = describe(target_dir, &preview, &candidate.name, "rename");

        if self.options.dry_run {
            info!("Dry run: {}", detail);
            return Ok((Disposition::Planned, target_dir.to_path_buf(), Some(preview.final_path)));
        }

        if !self.decisions.confirm("Would you like to rename the directory?", &detail)? {
            info!("Directory rename cancelled by user");
            return Ok((Disposition::Declined, target_dir.to_path_buf(), None));
        }

        Ok(self.local_rename(target_dir, candidate, ctx, attempt_number, NO_DATA_HOME_PARENT))
    }

    /// Rename next to the original location and log the outcome under `parent_tag`
    fn local_rename(
        &self,
        target_dir: &Path,
        candidate: &Candidate,
        ctx: &SessionContext,
        attempt_number: u32,
        parent_tag: &str,
    ) -> (Disposition, PathBuf, Option<PathBuf>) {
        let parent = local_parent(target_dir);
        let attempt = self
            .resolver
            .resolve(&candidate.name, &parent)
            .and_then(|p| rename_directory(target_dir, &p.final_path).map(|_| p).map_err(Into::into));

        match attempt {
            Ok(placement) => {
                info!("Directory renamed to {:?}", placement.final_path);
                self.logger.record(
                    &AttemptLogEntry::new(ctx, attempt_number, UserAction::LocalRenameSuccess)
                        .with_name(&placement.final_name)
                        .with_parent(parent_tag)
                        .with_destination(&placement.final_path),
                );
                let destination = placement.final_path.clone();
                (Disposition::RenamedLocally, placement.final_path, Some(destination))
            }
            Err(e) => {
                error!("Error renaming {:?}: {}", target_dir, e);
                let action = if parent_tag == LOCAL_FALLBACK_PARENT {
                    UserAction::TotalFailure
                } else {
                    UserAction::RenameFailed
                };
                let prefix = if action == UserAction::TotalFailure { "Local rename error" } else { "Rename error" };
                self.logger.record(
                    &AttemptLogEntry::new(ctx, attempt_number, action)
                        .with_name(&candidate.name)
                        .with_parent(parent_tag)
                        .with_feedback(&format!("{}: {}", prefix, e))
                        .with_destination(target_dir),
                );
                (Disposition::Failed, target_dir.to_path_buf(), None)
            }
        }
    }
}

fn local_parent(dir: &Path) -> PathBuf {
    dir.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
}

fn describe(from: &Path, preview: &Placement, base: &str, verb: &str) -> String {
    let mut detail = format!("This will {} '{}' to '{}'", verb, from.display(), preview.final_path.display());
    if preview.is_suffixed(base) {
        detail.push_str(&format!(" (conflict detected, final name will be {})", preview.final_name));
    }
    detail
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{CandidateView, Decision};
    use crate::naming::{validate, NamingClient, FALLBACK_STUB};
    use crate::testing::{ScriptedDecisions, ScriptedProposer};
    use async_trait::async_trait;
    use std::fs;

    struct Fixture {
        _root: tempfile::TempDir,
        base: PathBuf,
        inbox: PathBuf,
        data_home: PathBuf,
        logger: AttemptLogger,
    }

    fn fixture() -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().canonicalize().unwrap();
        let inbox = base.join("inbox");
        fs::create_dir_all(&inbox).unwrap();
        fs::write(inbox.join("agenda.md"), "# Quarterly meeting\n- budget\n- hiring").unwrap();
        let data_home = base.join("DATA-HOME");
        fs::create_dir_all(data_home.join("filetree/roots")).unwrap();
        let logger = AttemptLogger::new(base.join("attempts.csv"));
        Fixture { _root: root, base, inbox, data_home, logger }
    }

    fn rows(logger: &AttemptLogger) -> Vec<csv::StringRecord> {
        csv::Reader::from_path(logger.path())
            .unwrap()
            .records()
            .map(|r| r.unwrap())
            .collect()
    }

    /// Creates `claim` when asked for move consent, as if another process
    /// took the name between the preview and the move
    struct ClaimOnMove {
        inner: ScriptedDecisions,
        claim: PathBuf,
    }

    impl DecisionProvider for ClaimOnMove {
        fn review(&mut self, view: &CandidateView<'_>) -> Result<Decision> {
            self.inner.review(view)
        }

        fn feedback(&mut self, candidate: &Candidate) -> Result<String> {
            self.inner.feedback(candidate)
        }

        fn confirm(&mut self, question: &str, detail: &str) -> Result<bool> {
            if question.contains("move") {
                fs::create_dir_all(&self.claim)?;
            }
            self.inner.confirm(question, detail)
        }
    }

    // Longer than any filesystem's NAME_MAX, so every rename to it fails.
    fn unplaceable_name() -> String {
        format!("doc{}", "A".repeat(300))
    }

    struct Echo;

    #[async_trait]
    impl Transcriber for Echo {
        async fn transcribe(&self, audio_file: &Path) -> Result<String> {
            Ok(format!("transcript of {}", audio_file.display()))
        }
    }

    #[tokio::test]
    async fn test_accepted_name_moves_into_data_home() {
        let f = fixture();
        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = ScriptedProposer::new(&["docMeetingNotes"]);
        let mut decisions = ScriptedDecisions::new(&[Decision::Accept], &[], &[true, true]);

        let report = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .with_data_home(Some(f.data_home.clone()))
            .run(&f.inbox)
            .await
            .unwrap();

        let expected = f.data_home.join("filetree/roots/documents/docMeetingNotes");
        assert_eq!(report.disposition, Disposition::Moved);
        assert_eq!(report.final_location, expected);
        assert_eq!(report.data_home_relative, Some(PathBuf::from("filetree/roots/documents/docMeetingNotes")));
        assert_eq!(report.attempts, 1);
        assert!(expected.join("agenda.md").exists());
        assert!(!f.inbox.exists());

        let rows = rows(&f.logger);
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][7], "accept");
        assert_eq!(&rows[1][7], "moved_successfully");
        assert_eq!(&rows[1][9], expected.to_string_lossy());
    }

    #[tokio::test]
    async fn test_local_rename_skips_taken_names() {
        let f = fixture();
        fs::create_dir(f.base.join("docBudgetPlan")).unwrap();
        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = ScriptedProposer::new(&["docBudgetPlan"]);
        let mut decisions = ScriptedDecisions::new(&[Decision::Accept], &[], &[true, true]);

        let report = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .run(&f.inbox)
            .await
            .unwrap();

        let expected = f.base.join("docBudgetPlan1");
        assert_eq!(report.disposition, Disposition::RenamedLocally);
        assert_eq!(report.final_location, expected);
        assert!(expected.join("agenda.md").exists());
        assert!(f.base.join("docBudgetPlan").exists());

        let rows = rows(&f.logger);
        assert_eq!(&rows[1][7], "local_rename_success");
        assert_eq!(&rows[1][4], "docBudgetPlan1");
        assert_eq!(&rows[1][6], NO_DATA_HOME_PARENT);
    }

    #[tokio::test]
    async fn test_declined_move_leaves_directory() {
        let f = fixture();
        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = ScriptedProposer::new(&["docMeetingNotes"]);
        let mut decisions = ScriptedDecisions::new(&[Decision::Accept], &[], &[true, false]);

        let report = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .with_data_home(Some(f.data_home.clone()))
            .run(&f.inbox)
            .await
            .unwrap();

        assert_eq!(report.disposition, Disposition::Declined);
        assert_eq!(report.final_location, f.inbox);
        assert!(f.inbox.exists());
        assert_eq!(rows(&f.logger).len(), 1);
        assert_eq!(decisions.questions.len(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_previews_without_mutation() {
        let f = fixture();
        fs::create_dir_all(f.data_home.join("filetree/roots/documents/docMeetingNotes")).unwrap();
        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = ScriptedProposer::new(&["docMeetingNotes"]);
        let mut decisions = ScriptedDecisions::new(&[Decision::Accept], &[], &[true]);

        let report = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .with_data_home(Some(f.data_home.clone()))
            .with_options(OrganizeOptions { dry_run: true, save_analysis: None })
            .run(&f.inbox)
            .await
            .unwrap();

        assert_eq!(report.disposition, Disposition::Planned);
        assert_eq!(
            report.planned,
            Some(f.data_home.join("filetree/roots/documents/docMeetingNotes1"))
        );
        assert!(f.inbox.exists());
        assert_eq!(decisions.questions.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_move_falls_back_to_local_rename() {
        let f = fixture();
        // a file where the destination parent should be
        fs::write(f.data_home.join("filetree/roots/documents"), "").unwrap();
        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = ScriptedProposer::new(&["docMeetingNotes"]);
        let mut decisions = ScriptedDecisions::new(&[Decision::Accept], &[], &[true, true]);

        let report = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .with_data_home(Some(f.data_home.clone()))
            .run(&f.inbox)
            .await
            .unwrap();

        assert_eq!(report.disposition, Disposition::RenamedLocally);
        assert_eq!(report.final_location, f.base.join("docMeetingNotes"));
        assert!(report.data_home_relative.is_none());

        let rows = rows(&f.logger);
        let actions: Vec<&str> = rows.iter().map(|r| &r[7]).collect();
        assert_eq!(actions, vec!["accept", "move_failed", "local_rename_success"]);
        assert!(rows[1][8].starts_with("Move error:"));
        assert_eq!(&rows[2][6], LOCAL_FALLBACK_PARENT);
    }

    #[tokio::test]
    async fn test_failed_move_and_failed_fallback_is_total_failure() {
        let f = fixture();
        let name = unplaceable_name();
        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = ScriptedProposer::new(&[name.as_str()]);
        let mut decisions = ScriptedDecisions::new(&[Decision::Accept], &[], &[true, true]);

        let report = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .with_data_home(Some(f.data_home.clone()))
            .run(&f.inbox)
            .await
            .unwrap();

        assert_eq!(report.disposition, Disposition::Failed);
        assert_eq!(report.final_location, f.inbox);
        assert!(f.inbox.join("agenda.md").exists());

        let rows = rows(&f.logger);
        let actions: Vec<&str> = rows.iter().map(|r| &r[7]).collect();
        assert_eq!(actions, vec!["accept", "move_failed", "total_failure"]);
        assert!(rows[1][8].starts_with("Move error:"));
        assert_eq!(&rows[2][6], LOCAL_FALLBACK_PARENT);
        assert!(rows[2][8].starts_with("Local rename error:"));
        assert_eq!(&rows[2][9], f.inbox.to_string_lossy());
    }

    #[tokio::test]
    async fn test_failed_rename_without_data_home_leaves_directory() {
        let f = fixture();
        let name = unplaceable_name();
        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = ScriptedProposer::new(&[name.as_str()]);
        let mut decisions = ScriptedDecisions::new(&[Decision::Accept], &[], &[true, true]);

        let report = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .run(&f.inbox)
            .await
            .unwrap();

        assert_eq!(report.disposition, Disposition::Failed);
        assert_eq!(report.final_location, f.inbox);
        assert!(f.inbox.join("agenda.md").exists());

        let rows = rows(&f.logger);
        let actions: Vec<&str> = rows.iter().map(|r| &r[7]).collect();
        assert_eq!(actions, vec!["accept", "rename_failed"]);
        assert_eq!(&rows[1][6], NO_DATA_HOME_PARENT);
        assert!(rows[1][8].starts_with("Rename error:"));
    }

    #[tokio::test]
    async fn test_name_taken_after_preview_gets_a_suffix() {
        let f = fixture();
        let documents = f.data_home.join("filetree/roots/documents");
        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = ScriptedProposer::new(&["docMeetingNotes"]);
        let mut decisions = ClaimOnMove {
            inner: ScriptedDecisions::new(&[Decision::Accept], &[], &[true, true]),
            claim: documents.join("docMeetingNotes"),
        };

        let report = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .with_data_home(Some(f.data_home.clone()))
            .run(&f.inbox)
            .await
            .unwrap();

        let expected = documents.join("docMeetingNotes1");
        assert_eq!(report.disposition, Disposition::Moved);
        assert_eq!(report.final_location, expected);
        assert!(expected.join("agenda.md").exists());
        assert!(fs::read_dir(documents.join("docMeetingNotes")).unwrap().next().is_none());

        let rows = rows(&f.logger);
        assert_eq!(&rows[1][7], "moved_successfully");
        assert_eq!(&rows[1][4], "docMeetingNotes1");
        assert_eq!(&rows[1][9], expected.to_string_lossy());
    }

    #[tokio::test]
    async fn test_cancelled_negotiation_reports_unnamed() {
        let f = fixture();
        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = ScriptedProposer::new(&["docMeetingNotes"]);
        let mut decisions = ScriptedDecisions::new(&[Decision::Cancel], &[], &[true]);

        let report = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .run(&f.inbox)
            .await
            .unwrap();

        assert_eq!(report.disposition, Disposition::Unnamed);
        assert!(report.session_id.is_some());
        assert!(f.inbox.exists());
    }

    #[tokio::test]
    async fn test_declining_analysis_skips_everything() {
        let f = fixture();
        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = ScriptedProposer::new(&["docMeetingNotes"]);
        let mut decisions = ScriptedDecisions::new(&[], &[], &[false]);

        let report = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .run(&f.inbox)
            .await
            .unwrap();

        assert_eq!(report.disposition, Disposition::Skipped);
        assert!(proposer.calls().is_empty());
        assert!(!f.logger.path().exists());
    }

    #[tokio::test]
    async fn test_staged_audio_becomes_the_target() {
        let f = fixture();
        fs::write(f.inbox.join("standup.mp3"), "id3").unwrap();
        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = ScriptedProposer::new(&["audRecStandup"]);
        let mut decisions = ScriptedDecisions::new(&[Decision::Accept], &[], &[true, true, true]);
        let transcriber = Echo;

        let report = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .with_transcriber(Some(&transcriber))
            .run(&f.inbox)
            .await
            .unwrap();

        let renamed = f.inbox.join("audRecStandup");
        assert_eq!(report.final_location, renamed);
        assert!(renamed.join("standup.mp3").exists());
        assert!(renamed.join("standup_transcript.txt").exists());
        assert!(f.inbox.join("agenda.md").exists());

        let rows = rows(&f.logger);
        assert_eq!(&rows[0][11], "yes");
        assert_eq!(&rows[0][3], f.inbox.to_string_lossy());
    }

    #[tokio::test]
    async fn test_unnamed_content_falls_back_to_generic_documents() {
        let f = fixture();
        let photos = f.base.join("photos");
        fs::create_dir(&photos).unwrap();
        fs::write(photos.join("scan.jpg"), vec![0u8; 64]).unwrap();

        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = NamingClient::new(&taxonomy, None, &config.engine);
        let mut decisions = ScriptedDecisions::new(&[Decision::Accept], &[], &[true, true]);

        let report = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .with_data_home(Some(f.data_home.clone()))
            .run(&photos)
            .await
            .unwrap();

        let documents = f.data_home.join("filetree/roots/documents");
        assert_eq!(report.disposition, Disposition::Moved);
        assert_eq!(report.final_location.parent(), Some(documents.as_path()));
        let name = report.final_location.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(FALLBACK_STUB));
        assert!(validate(&name));

        let rows = rows(&f.logger);
        assert_eq!(&rows[0][10], "0");
    }

    #[tokio::test]
    async fn test_news_transcript_source_goes_to_text_documents() {
        let f = fixture();
        let source = f.base.join("News/transcripts/evening");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("bulletin.txt"), "Tonight's headlines").unwrap();

        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = ScriptedProposer::new(&["codeToolsCli"]);
        let mut decisions = ScriptedDecisions::new(&[Decision::Accept], &[], &[true, true]);

        let report = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .with_data_home(Some(f.data_home.clone()))
            .run(&source)
            .await
            .unwrap();

        assert_eq!(
            report.final_location,
            f.data_home.join("filetree/roots/documents/Text Documents/codeToolsCli")
        );
        assert_eq!(&rows(&f.logger)[0][12], "yes");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_indirect_path_is_resolved_before_routing_and_moving() {
        let f = fixture();
        let source = f.base.join("News/transcripts/evening");
        fs::create_dir_all(source.join("notes")).unwrap();
        fs::write(source.join("bulletin.txt"), "Tonight's headlines").unwrap();
        std::os::unix::fs::symlink(f.base.join("News/transcripts"), f.base.join("shortcut")).unwrap();
        // names the evening directory without a News/transcripts segment,
        // and ends in a component that cannot be renamed
        let indirect = f.base.join("shortcut/evening/notes/..");

        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = ScriptedProposer::new(&["codeToolsCli"]);
        let mut decisions = ScriptedDecisions::new(&[Decision::Accept], &[], &[true, true]);

        let report = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .with_data_home(Some(f.data_home.clone()))
            .run(&indirect)
            .await
            .unwrap();

        let expected = f.data_home.join("filetree/roots/documents/Text Documents/codeToolsCli");
        assert_eq!(report.disposition, Disposition::Moved);
        assert_eq!(report.final_location, expected);
        assert!(expected.join("bulletin.txt").exists());
        assert!(!source.exists());

        let rows = rows(&f.logger);
        assert_eq!(&rows[0][3], source.to_string_lossy());
        assert_eq!(&rows[0][12], "yes");
        assert_eq!(&rows[1][7], "moved_successfully");
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let f = fixture();
        let config = AppConfig::default();
        let taxonomy = NamingTaxonomy::standard();
        let proposer = ScriptedProposer::new(&["docX"]);
        let mut decisions = ScriptedDecisions::default();

        let err = Organizer::new(&config, &taxonomy, &proposer, &f.logger, &mut decisions)
            .run(&f.base.join("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::DirectoryNotFound(_)));
    }
}
