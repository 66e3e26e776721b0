//! CLI interface for the resume screener

use crate::config::{JobSelection, OutputFormat, ScoringStrategy};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "Match resumes against job descriptions and flag age-related language")]
#[command(long_about = "Score resumes against job descriptions by textual similarity (TF-IDF or Model2Vec embeddings), flag resumes that disclose age or birth date, and optionally request recruiter-style feedback from Gemini")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score resumes against job descriptions and report age bias
    Screen {
        /// Directory of resumes
        #[arg(short, long)]
        resumes: Option<PathBuf>,

        /// Directory of job descriptions
        #[arg(short, long)]
        jobs: Option<PathBuf>,

        /// Scoring strategy: lexical, embedding
        #[arg(long)]
        strategy: Option<ScoringStrategy>,

        /// Job selection: all, first, interactive
        #[arg(long)]
        select: Option<JobSelection>,

        /// Request LLM feedback for every scored pair
        #[arg(long)]
        feedback: bool,

        /// Sort each job's results by score, best first
        #[arg(long)]
        sort: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<OutputFormat>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Report resumes that mention age or birth date
    Bias {
        /// Directory of resumes
        #[arg(short, long)]
        resumes: Option<PathBuf>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<OutputFormat>,
    },

    /// Ask the LLM for a recruiter-style review of one resume
    Feedback {
        /// Path to resume file (TXT, MD, PDF)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,
    },

    /// Ask the LLM a question about one resume and job description
    Ask {
        /// Path to resume file (TXT, MD, PDF)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// The question to answer
        #[arg(short, long)]
        question: String,
    },

    /// Embedding model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List known embedding models
    List,

    /// Download an embedding model
    Download {
        /// Model id, name or HuggingFace repo ID
        model: String,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
