//! File type detection

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }
}

/// True when the file's extension is one of `extensions` (case-insensitive)
pub fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        None => false,
    }
}
