//! Input manager for handling different file types

use crate::error::{Result, ScreenerError};
use crate::input::file_detector::{has_allowed_extension, FileType};
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::document::{Document, DocumentType};
use crate::processing::text_processor::TextProcessor;
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    extensions: Vec<String>,
    normalizer: Option<TextProcessor>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            extensions: vec!["txt".to_string()],
            normalizer: None,
        }
    }

    /// Restrict directory loading to these extensions
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Lowercase and strip punctuation from every loaded document
    pub fn with_normalization(mut self, enable: bool) -> Self {
        self.normalizer = enable.then(TextProcessor::new);
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        // Check cache first
        if let Some(cached_text) = self.cache.get(path) {
            debug!("Using cached text for: {}", path.display());
            return Ok(cached_text.clone());
        }

        if !path.exists() {
            return Err(ScreenerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(ScreenerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        let text = match &self.normalizer {
            Some(processor) => processor.clean_text(&text),
            None => text,
        };

        self.cache.insert(path.to_path_buf(), text.clone());

        Ok(text)
    }

    /// Load a single file as a document named after its file name
    pub async fn load_document(&mut self, path: &Path, document_type: DocumentType) -> Result<Document> {
        let content = self.extract_text(path).await?;
        Ok(Document::new(file_name(path), content, document_type))
    }

    /// Load every file with an allowed extension from `dir`, sorted by file name.
    ///
    /// A missing or unreadable directory is an error; subdirectories and other
    /// extensions are skipped.
    pub async fn load_directory(&mut self, dir: &Path, document_type: DocumentType) -> Result<Vec<Document>> {
        let mut entries = fs::read_dir(dir).await.map_err(|e| {
            ScreenerError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {} directory {}: {}", document_type, dir.display(), e),
            ))
        })?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if has_allowed_extension(&path, &self.extensions) {
                paths.push(path);
            } else {
                debug!("Skipping {}", path.display());
            }
        }
        paths.sort_by_key(|path| file_name(path));

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            documents.push(self.load_document(&path, document_type).await?);
        }

        info!("Loaded {} {} file(s) from {}", documents.len(), document_type, dir.display());
        Ok(documents)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
