//! The similarity scoring capability and strategy selection

use crate::config::{Config, ScoringStrategy};
use crate::error::{Result, ScreenerError};
use crate::processing::embedding_manager::EmbeddingModelManager;
use crate::processing::embeddings::EmbeddingScorer;
use crate::processing::tfidf::{sparse_cosine, TfIdfVectorizer};
use log::{debug, info, warn};

/// Scores how well a resume matches a job description; higher is more similar.
///
/// Implementations never fail: empty or degenerate text scores 0, and the
/// returned value is always finite.
pub trait Scorer {
    fn name(&self) -> &str;
    fn score(&mut self, resume: &str, job: &str) -> f32;
}

/// TF-IDF cosine similarity, in [0, 1]
#[derive(Default)]
pub struct LexicalScorer {
    vectorizer: TfIdfVectorizer,
}

impl LexicalScorer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scorer for LexicalScorer {
    fn name(&self) -> &str {
        "lexical"
    }

    fn score(&mut self, resume: &str, job: &str) -> f32 {
        let (resume_vector, job_vector) = self.vectorizer.fit_pair(resume, job);
        let score = sparse_cosine(&resume_vector, &job_vector);
        debug!(
            "Lexical similarity over {}/{} terms: {:.4}",
            resume_vector.len(),
            job_vector.len(),
            score
        );
        score
    }
}

/// Build the scorer selected by `scoring.strategy`.
///
/// The embedding model is resolved through the model manager (downloading it
/// if needed). When that fails and `scoring.fallback_to_lexical` is set, the
/// lexical scorer is used instead.
pub async fn build_scorer(config: &Config) -> Result<Box<dyn Scorer>> {
    match config.scoring.strategy {
        ScoringStrategy::Lexical => {
            info!("Using lexical (TF-IDF) scorer");
            Ok(Box::new(LexicalScorer::new()))
        }
        ScoringStrategy::Embedding => match load_embedding_scorer(config).await {
            Ok(scorer) => {
                info!("Using embedding scorer ({})", scorer.model_name());
                Ok(Box::new(scorer))
            }
            Err(e) if config.scoring.fallback_to_lexical => {
                warn!("Embedding model unavailable ({}); falling back to lexical scorer", e);
                Ok(Box::new(LexicalScorer::new()))
            }
            Err(e) => Err(e),
        },
    }
}

async fn load_embedding_scorer(config: &Config) -> Result<EmbeddingScorer> {
    let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

    // Resolve the configured name, downloading on first use
    let requested = &config.scoring.embedding_model;
    let model_id = manager
        .resolve_model_id(requested)
        .ok_or_else(|| ScreenerError::ModelNotFound(requested.clone()))?;
    let model_path = manager.ensure_model_available(&model_id).await?;
    EmbeddingScorer::from_model_path(&model_path, model_id)
}
