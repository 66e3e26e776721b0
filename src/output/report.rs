//! Screening report structures

use crate::config::JobSelection;
use crate::processing::bias::BiasFinding;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One resume scored against one job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub resume: String,
    pub job: String,
    pub score: f32,
}

/// Every resume's score against a single job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatches {
    pub job: String,
    pub results: Vec<SimilarityResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum FeedbackOutcome {
    Feedback(String),
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub resume: String,
    pub job: String,
    pub outcome: FeedbackOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasReport {
    /// Number of resumes scanned
    pub scanned: usize,
    pub findings: Vec<BiasFinding>,
}

impl BiasReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn flagged_names(&self) -> Vec<&str> {
        self.findings.iter().map(|f| f.document.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningOutcome {
    Completed,
    NoJobDescriptions,
    NoResumes,
}

impl ScreeningOutcome {
    /// Message shown to the operator when a run ends without scoring
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ScreeningOutcome::Completed => None,
            ScreeningOutcome::NoJobDescriptions => Some("No job descriptions found."),
            ScreeningOutcome::NoResumes => Some("No resumes found."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub generated_at: DateTime<Utc>,
    pub scorer: String,
    pub job_selection: JobSelection,
    pub outcome: ScreeningOutcome,
    pub matches: Vec<JobMatches>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<FeedbackEntry>,
    /// Absent when the run ended before scoring
    pub bias: Option<BiasReport>,
}

impl ScreeningReport {
    pub fn empty(scorer: &str, job_selection: JobSelection, outcome: ScreeningOutcome) -> Self {
        Self {
            generated_at: Utc::now(),
            scorer: scorer.to_string(),
            job_selection,
            outcome,
            matches: Vec::new(),
            feedback: Vec::new(),
            bias: None,
        }
    }

    pub fn comparison_count(&self) -> usize {
        self.matches.iter().map(|m| m.results.len()).sum()
    }

    /// Feedback recorded for a resume/job pair
    pub fn feedback_for(&self, resume: &str, job: &str) -> Option<&FeedbackOutcome> {
        self.feedback
            .iter()
            .find(|entry| entry.resume == resume && entry.job == job)
            .map(|entry| &entry.outcome)
    }
}
