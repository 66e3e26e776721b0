//! Dense sentence-embedding scoring using Model2Vec

use crate::error::Result;
use crate::processing::scorer::Scorer;
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

/// Anything that maps a text to a fixed-length dense vector
pub trait TextEncoder {
    fn encode(&self, text: &str) -> Vec<f32>;
}

impl TextEncoder for StaticModel {
    fn encode(&self, text: &str) -> Vec<f32> {
        self.encode_single(text)
    }
}

/// Load a Model2Vec model from a local directory
pub fn load_static_model(model_path: &Path) -> Result<StaticModel> {
    let start_time = Instant::now();
    info!("Loading Model2Vec embedding model from: {}", model_path.display());

    let model = StaticModel::from_pretrained(
        model_path,
        None, // token
        None, // normalize
        None, // subfolder
    )?;

    info!("Model loaded in {:.2?}", start_time.elapsed());
    Ok(model)
}

/// Cosine similarity scorer over dense embeddings.
///
/// Owns its encoder for the lifetime of the run. Encodings are memoised per
/// text, so a job description scored against many resumes is encoded once.
pub struct EmbeddingScorer {
    encoder: Box<dyn TextEncoder>,
    model_name: String,
    cache: HashMap<String, Vec<f32>>,
}

impl EmbeddingScorer {
    pub fn new(encoder: Box<dyn TextEncoder>, model_name: impl Into<String>) -> Self {
        Self {
            encoder,
            model_name: model_name.into(),
            cache: HashMap::new(),
        }
    }

    pub fn from_model_path(model_path: &Path, model_name: impl Into<String>) -> Result<Self> {
        let model = load_static_model(model_path)?;
        Ok(Self::new(Box::new(model), model_name))
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    fn embed(&mut self, text: &str) -> Vec<f32> {
        if let Some(cached) = self.cache.get(text) {
            return cached.clone();
        }
        let embedding = self.encoder.encode(text);
        self.cache.insert(text.to_string(), embedding.clone());
        embedding
    }
}

impl Scorer for EmbeddingScorer {
    fn name(&self) -> &str {
        "embedding"
    }

    fn score(&mut self, resume: &str, job: &str) -> f32 {
        let resume_embedding = self.embed(resume);
        let job_embedding = self.embed(job);
        let score = cosine_similarity(&resume_embedding, &job_embedding);
        debug!("Embedding similarity ({}): {:.4}", self.model_name, score);
        score
    }
}

/// Cosine similarity in [-1, 1]; 0 for empty, zero or mismatched vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot_product / (norm_a * norm_b);
    if score.is_finite() {
        score.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Letter-frequency encoder that counts how often it is called
    struct StubEncoder {
        calls: Rc<Cell<usize>>,
    }

    impl TextEncoder for StubEncoder {
        fn encode(&self, text: &str) -> Vec<f32> {
            self.calls.set(self.calls.get() + 1);
            let mut vector = vec![0.0; 26];
            for c in text.to_lowercase().chars().filter(|c| c.is_ascii_lowercase()) {
                vector[(c as u8 - b'a') as usize] += 1.0;
            }
            vector
        }
    }

    fn stub_scorer() -> (EmbeddingScorer, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let encoder = StubEncoder { calls: Rc::clone(&calls) };
        (EmbeddingScorer::new(Box::new(encoder), "stub"), calls)
    }

    #[test]
    fn test_embedding_score_is_symmetric() {
        let (mut scorer, _) = stub_scorer();
        let forward = scorer.score("Rust systems engineer", "Senior backend developer");
        let backward = scorer.score("Senior backend developer", "Rust systems engineer");
        assert_eq!(forward, backward);
        assert!(forward > 0.0 && forward <= 1.0);
    }

    #[test]
    fn test_encodings_are_memoised() {
        let (mut scorer, calls) = stub_scorer();
        let job = "Looking for a Python developer";
        scorer.score("resume one", job);
        scorer.score("resume two", job);
        scorer.score("resume one", job);

        assert_eq!(calls.get(), 3);
        assert_eq!(scorer.cache_size(), 3);
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let (mut scorer, _) = stub_scorer();
        assert_eq!(scorer.score("", "Python developer"), 0.0);
        assert_eq!(scorer.score("1234 !!", "Python developer"), 0.0);
    }

    #[test]
    fn test_cosine_edge_cases() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-6);
    }
}
