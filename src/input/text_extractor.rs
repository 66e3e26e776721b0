//! Text extraction from various file formats

use crate::error::{Result, ScreenerError};
use log::warn;
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::borrow::Cow;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            ScreenerError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;
        Ok(text)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        Ok(decode_lossy(&bytes, path))
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        let markdown_content = decode_lossy(&bytes, path);

        // Render to HTML, then strip tags
        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(self.html_to_text(&html_output))
    }
}

impl MarkdownExtractor {
    fn html_to_text(&self, html: &str) -> String {
        static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
        let tag_regex = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

        // Convert common HTML elements to text
        let text = html
            .replace("<br>", "\n")
            .replace("</p>", "\n\n")
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'");

        let clean_text = tag_regex.replace_all(&text, "");

        // Drop blank lines
        let lines: Vec<&str> = clean_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        lines.join("\n")
    }
}

/// Decode as UTF-8, replacing invalid sequences
fn decode_lossy(bytes: &[u8], path: &Path) -> String {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => {
            warn!("Invalid UTF-8 in {}; undecodable bytes were replaced", path.display());
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_plain_text_is_decoded_lossily() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.txt");
        std::fs::write(&path, b"Rust \xFF engineer").unwrap();

        let text = PlainTextExtractor.extract(&path).await.unwrap();
        assert!(text.starts_with("Rust "));
        assert!(text.ends_with(" engineer"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[tokio::test]
    async fn test_markdown_formatting_is_stripped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cv.md");
        std::fs::write(&path, "## Skills\n\n**Rust** and *Go*\n").unwrap();

        let text = MarkdownExtractor.extract(&path).await.unwrap();
        assert!(text.contains("Skills"));
        assert!(text.contains("Rust and Go"));
        assert!(!text.contains("**"));
        assert!(!text.contains("##"));
    }
}
