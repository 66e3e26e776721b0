//! Remote language-model feedback

pub mod client;
pub mod prompts;

pub use client::{FeedbackProvider, GeminiClient};
