//! Text processing, similarity scoring and bias detection

pub mod bias;
pub mod document;
pub mod embedding_manager;
pub mod embeddings;
pub mod scorer;
pub mod screener;
pub mod text_processor;
pub mod tfidf;
