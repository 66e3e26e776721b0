//! Document structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named text loaded for one run. Never mutated after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub content: String,
    pub document_type: DocumentType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Resume,
    JobDescription,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>, document_type: DocumentType) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            document_type,
        }
    }

    pub fn resume(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, content, DocumentType::Resume)
    }

    pub fn job(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, content, DocumentType::JobDescription)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Resume => write!(f, "resume"),
            DocumentType::JobDescription => write!(f, "job description"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_constructors() {
        let resume = Document::resume("r1.txt", "Python developer with 5 years experience");
        assert_eq!(resume.document_type, DocumentType::Resume);
        assert_eq!(resume.name, "r1.txt");

        let job = Document::job("j1.txt", "   \n\t");
        assert_eq!(job.document_type, DocumentType::JobDescription);
        assert_eq!(job.content, "   \n\t");
        assert_eq!(job.document_type.to_string(), "job description");
    }
}
