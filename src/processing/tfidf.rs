//! TF-IDF vectors over a two-document corpus

use crate::processing::text_processor::TextProcessor;
use std::collections::BTreeMap;

/// Sparse term -> weight vector, ordered by term
pub type SparseVector = BTreeMap<String, f32>;

/// Builds TF-IDF vectors for a resume/job pair.
///
/// The pair is the whole corpus, so `idf(t) = ln((1 + n) / (1 + df(t))) + 1`
/// with `n = 2`: shared terms weigh 1.0, terms unique to one side weigh
/// `ln(1.5) + 1`.
pub struct TfIdfVectorizer {
    processor: TextProcessor,
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfIdfVectorizer {
    pub fn new() -> Self {
        Self {
            processor: TextProcessor::new(),
        }
    }

    pub fn term_counts(&self, text: &str) -> SparseVector {
        let mut counts = SparseVector::new();
        for term in self.processor.content_terms(text) {
            *counts.entry(term).or_insert(0.0) += 1.0;
        }
        counts
    }

    pub fn fit_pair(&self, first: &str, second: &str) -> (SparseVector, SparseVector) {
        let first_counts = self.term_counts(first);
        let second_counts = self.term_counts(second);

        let corpus_size = 2.0_f32;
        let weigh = |counts: &SparseVector, other: &SparseVector| -> SparseVector {
            counts
                .iter()
                .map(|(term, tf)| {
                    let df = if other.contains_key(term) { 2.0 } else { 1.0 };
                    let idf = ((1.0 + corpus_size) / (1.0 + df)).ln() + 1.0;
                    (term.clone(), tf * idf)
                })
                .collect()
        };

        (
            weigh(&first_counts, &second_counts),
            weigh(&second_counts, &first_counts),
        )
    }
}

/// Cosine of two sparse vectors; 0 when either has no weight
pub fn sparse_cosine(a: &SparseVector, b: &SparseVector) -> f32 {
    let norm_a = a.values().map(|w| w * w).sum::<f32>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    // Shared terms are visited in key order whichever side is smaller, so
    // score(a, b) == score(b, a) exactly
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f32 = small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|other| w * other))
        .sum();

    let score = dot / (norm_a * norm_b);
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
