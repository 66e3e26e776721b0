//! Error handling for the resume screener

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Feedback service unavailable: {0}")]
    FeedbackUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

/// The model2vec loader reports failures through anyhow
impl From<anyhow::Error> for ScreenerError {
    fn from(err: anyhow::Error) -> Self {
        ScreenerError::ModelLoading(err.to_string())
    }
}

/// Every HTTP failure talking to the feedback service collapses into one kind
impl From<reqwest::Error> for ScreenerError {
    fn from(err: reqwest::Error) -> Self {
        ScreenerError::FeedbackUnavailable(err.without_url().to_string())
    }
}

impl ScreenerError {
    /// True for failures of the remote feedback collaborator, which must never
    /// abort a screening batch.
    pub fn is_feedback_unavailable(&self) -> bool {
        matches!(self, ScreenerError::FeedbackUnavailable(_))
    }
}
