//! Screening orchestration: load, select jobs, score, feedback, bias report

use crate::config::{Config, JobSelection};
use crate::error::{Result, ScreenerError};
use crate::input::InputManager;
use crate::llm::{FeedbackProvider, GeminiClient};
use crate::output::report::{
    BiasReport, FeedbackEntry, FeedbackOutcome, JobMatches, ScreeningOutcome, ScreeningReport,
    SimilarityResult,
};
use crate::processing::bias::BiasDetector;
use crate::processing::document::{Document, DocumentType};
use crate::processing::scorer::{build_scorer, Scorer};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

pub struct Screener {
    scorer: Box<dyn Scorer>,
    detector: BiasDetector,
    feedback: Option<Box<dyn FeedbackProvider>>,
    selection: JobSelection,
    sort_by_score: bool,
    show_progress: bool,
}

impl Screener {
    pub fn new(scorer: Box<dyn Scorer>, detector: BiasDetector) -> Self {
        Self {
            scorer,
            detector,
            feedback: None,
            selection: JobSelection::All,
            sort_by_score: false,
            show_progress: false,
        }
    }

    pub fn with_feedback(mut self, provider: Box<dyn FeedbackProvider>) -> Self {
        self.feedback = Some(provider);
        self
    }

    pub fn with_job_selection(mut self, selection: JobSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_sort_by_score(mut self, sort: bool) -> Self {
        self.sort_by_score = sort;
        self
    }

    /// Show a spinner while waiting on the feedback service
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Assemble scorer, bias detector and (when enabled) feedback client.
    ///
    /// A feedback client that cannot be created (e.g. no API key) disables
    /// feedback for the run with a warning.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let scorer = build_scorer(config).await?;
        let detector = BiasDetector::from_config(&config.bias);

        let mut screener = Self::new(scorer, detector)
            .with_job_selection(config.screening.job_selection)
            .with_sort_by_score(config.output.sort_by_score);

        if config.feedback.enabled {
            match GeminiClient::from_config(&config.feedback) {
                Ok(client) => {
                    info!("Feedback enabled using {}", client.model());
                    screener = screener.with_feedback(Box::new(client));
                }
                Err(e) => warn!("Feedback disabled: {}", e),
            }
        }

        Ok(screener)
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Load both directories and screen them. Loading errors abort the run.
    pub async fn screen_directories<R: BufRead, W: Write>(
        &mut self,
        loader: &mut InputManager,
        resumes_dir: &Path,
        jobs_dir: &Path,
        input: &mut R,
        output: &mut W,
    ) -> Result<ScreeningReport> {
        let resumes = loader.load_directory(resumes_dir, DocumentType::Resume).await?;
        let jobs = loader.load_directory(jobs_dir, DocumentType::JobDescription).await?;
        self.screen(&resumes, &jobs, input, output).await
    }

    /// Score every selected job against every resume, then scan the resumes
    /// for age-related language.
    ///
    /// `input`/`output` are only used for interactive job selection. Empty
    /// input sets end the run without scoring.
    pub async fn screen<R: BufRead, W: Write>(
        &mut self,
        resumes: &[Document],
        jobs: &[Document],
        input: &mut R,
        output: &mut W,
    ) -> Result<ScreeningReport> {
        let scorer_name = self.scorer.name().to_string();

        // Nothing to score
        if jobs.is_empty() {
            info!("No job descriptions found.");
            return Ok(ScreeningReport::empty(&scorer_name, self.selection, ScreeningOutcome::NoJobDescriptions));
        }
        if resumes.is_empty() {
            info!("No resumes found.");
            return Ok(ScreeningReport::empty(&scorer_name, self.selection, ScreeningOutcome::NoResumes));
        }

        // Pick which jobs to score
        let selected: Vec<&Document> = match self.selection {
            JobSelection::All => jobs.iter().collect(),
            JobSelection::First => jobs.iter().take(1).collect(),
            JobSelection::Interactive => vec![&jobs[select_job_interactive(jobs, input, output)?]],
        };

        // Score all resumes against each selected job
        let mut matches = Vec::with_capacity(selected.len());
        for job in &selected {
            matches.push(self.score_job(resumes, job));
        }

        // Feedback failures are recorded per pair, never fatal
        let mut feedback = Vec::new();
        if self.feedback.is_some() {
            for job in &selected {
                for resume in resumes {
                    feedback.push(self.request_feedback(resume, job).await);
                }
            }
        }

        // Scan resumes for age-related language
        let bias = BiasReport {
            scanned: resumes.len(),
            findings: self.detector.detect(resumes),
        };
        info!(
            "Scored {} resume(s) against {} job description(s); {} flagged for age language",
            resumes.len(),
            selected.len(),
            bias.findings.len()
        );

        Ok(ScreeningReport {
            generated_at: Utc::now(),
            scorer: scorer_name,
            job_selection: self.selection,
            outcome: ScreeningOutcome::Completed,
            matches,
            feedback,
            bias: Some(bias),
        })
    }

    fn score_job(&mut self, resumes: &[Document], job: &Document) -> JobMatches {
        let mut results: Vec<SimilarityResult> = resumes
            .iter()
            .map(|resume| {
                let score = self.scorer.score(&resume.content, &job.content);
                // Degenerate vectors score zero
                let score = if score.is_finite() { score } else { 0.0 };
                debug!("{} vs {}: {:.4}", resume.name, job.name, score);
                SimilarityResult {
                    resume: resume.name.clone(),
                    job: job.name.clone(),
                    score,
                }
            })
            .collect();

        if self.sort_by_score {
            // Stable, so ties keep load order
            results.sort_by(|a, b| b.score.total_cmp(&a.score));
        }

        JobMatches {
            job: job.name.clone(),
            results,
        }
    }

    async fn request_feedback(&self, resume: &Document, job: &Document) -> FeedbackEntry {
        let outcome = match &self.feedback {
            Some(provider) => {
                let spinner = self.show_progress.then(|| feedback_spinner(&resume.name, &job.name));
                let result = provider.generate_feedback(&resume.content, &job.content).await;
                if let Some(spinner) = spinner {
                    spinner.finish_and_clear();
                }
                match result {
                    Ok(text) => FeedbackOutcome::Feedback(text),
                    Err(e) => {
                        warn!("Feedback for {} / {} failed: {}", resume.name, job.name, e);
                        FeedbackOutcome::Unavailable(e.to_string())
                    }
                }
            }
            None => FeedbackOutcome::Unavailable("Feedback is disabled".to_string()),
        };

        FeedbackEntry {
            resume: resume.name.clone(),
            job: job.name.clone(),
            outcome,
        }
    }
}

pub fn feedback_spinner(resume: &str, job: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Requesting feedback for {} (job: {})", resume, job));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Print a numbered list of jobs and read a 1-based selection, re-prompting on
/// anything that is not a number in range. Returns the 0-based index.
pub fn select_job_interactive<R: BufRead, W: Write>(jobs: &[Document], input: &mut R, output: &mut W) -> Result<usize> {
    if jobs.is_empty() {
        return Err(ScreenerError::InvalidInput("No job descriptions to select from".to_string()));
    }

    writeln!(output, "Available job descriptions:")?;
    for (i, job) in jobs.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, job.name)?;
    }

    // Keep asking until we get a valid number
    let mut line = String::new();
    loop {
        write!(output, "Select a job description by number (1-{}): ", jobs.len())?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(ScreenerError::InvalidInput(
                "Input ended before a job description was selected".to_string(),
            ));
        }

        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=jobs.len()).contains(&choice) => return Ok(choice - 1),
            _ => writeln!(output, "Invalid selection. Enter a number between 1 and {}.", jobs.len())?,
        }
    }
}
