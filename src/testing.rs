// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Scripted collaborators shared by the unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::analyzer::{AnalysisPayload, ExtractionMode};
use crate::decision::{CandidateView, Decision, DecisionProvider};
use crate::naming::{Candidate, NameProposer};
use crate::Result;

/// Replays canned answers; runs out into Cancel / "" / false
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    reviews: VecDeque<Decision>,
    feedback: VecDeque<String>,
    confirms: VecDeque<bool>,
    /// (name, attempt_number, retries_left) for every review
    pub reviewed: Vec<(String, u32, u32)>,
    pub questions: Vec<String>,
}

impl ScriptedDecisions {
    pub fn new(reviews: &[Decision], feedback: &[&str], confirms: &[bool]) -> Self {
        Self {
            reviews: reviews.iter().copied().collect(),
            feedback: feedback.iter().map(|s| s.to_string()).collect(),
            confirms: confirms.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn review(&mut self, view: &CandidateView<'_>) -> Result<Decision> {
        self.reviewed.push((view.candidate.name.clone(), view.attempt_number, view.retries_left));
        Ok(self.reviews.pop_front().unwrap_or(Decision::Cancel))
    }

    fn feedback(&mut self, _candidate: &Candidate) -> Result<String> {
        Ok(self.feedback.pop_front().unwrap_or_default())
    }

    fn confirm(&mut self, question: &str, _detail: &str) -> Result<bool> {
        self.questions.push(question.to_string());
        Ok(self.confirms.pop_front().unwrap_or(false))
    }
}

/// What a [`ScriptedProposer`] saw on one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalCall {
    pub feedback: Vec<String>,
    pub mode: ExtractionMode,
}

/// Hands out names in order, repeating the last one
pub struct ScriptedProposer {
    names: Vec<String>,
    pub calls: Mutex<Vec<ProposalCall>>,
}

impl ScriptedProposer {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|s| s.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ProposalCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NameProposer for ScriptedProposer {
    async fn propose(&self, payload: &AnalysisPayload, feedback: &[String]) -> Candidate {
        let mut calls = self.calls.lock().unwrap();
        calls.push(ProposalCall {
            feedback: feedback.to_vec(),
            mode: payload.metadata.extraction_mode,
        });
        let index = (calls.len() - 1).min(self.names.len().saturating_sub(1));
        let name = self.names.get(index).cloned().unwrap_or_default();
        Candidate::generated(name)
    }
}
