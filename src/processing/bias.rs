//! Heuristic detection of age and birth-date disclosures in documents
//!
//! Each document is matched against a list of labelled, case-insensitive
//! regular expressions and flagged on the first pattern that matches. This
//! is a textual filter: false positives and negatives are expected.

use crate::config::{BiasConfig, BiasPreset};
use crate::processing::document::Document;
use log::{debug, info, warn};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// A labelled regular expression source, matched case-insensitively
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasPattern {
    pub label: String,
    pub pattern: String,
}

impl BiasPattern {
    pub fn new(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: pattern.into(),
        }
    }
}

/// A flagged document and the first pattern it matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasFinding {
    pub document: String,
    pub label: String,
    pub pattern: String,
}

const STANDARD_PATTERNS: &[(&str, &str)] = &[
    ("stated age", r"\bage\s*[:\-]?\s*\d{2}\b"),
    ("years old", r"\b\d{2}\s*years old\b"),
    ("years of age", r"\byears of age\b"),
    ("birth year", r"\bborn in \d{4}\b"),
    ("date of birth", r"\bdob\s*[:\-]?\s*\d{2}[/-]\d{2}[/-]\d{2,4}\b"),
    ("date of birth", r"\bdate of birth\b"),
    ("birth date", r"\bborn\s*[:\-]?\s*\w+\s+\d{1,2},?\s+\d{4}\b"),
];

// Bare numbers also match phone numbers, prices and percentages
const LITERAL_AGE_PATTERNS: &[(&str, &str)] = &[
    ("literal age", r"\b45\b"),
    ("literal age", r"\b50\b"),
    ("literal age", r"\b60\b"),
];

const BASIC_PATTERNS: &[(&str, &str)] = &[
    ("age", r"\bage\b"),
    ("years old", r"\byears old\b"),
    ("years count", r"\b\d{2}\s*(years|yrs)\b"),
    ("born in", r"\bborn in\b"),
    ("DOB", r"\bDOB\b"),
    ("birth", r"\bbirth\b"),
];

/// The pattern list for a preset
pub fn preset_patterns(preset: BiasPreset) -> Vec<BiasPattern> {
    let sources: Vec<&(&str, &str)> = match preset {
        BiasPreset::Standard => STANDARD_PATTERNS.iter().collect(),
        BiasPreset::Broad => STANDARD_PATTERNS.iter().chain(LITERAL_AGE_PATTERNS).collect(),
        BiasPreset::Basic => BASIC_PATTERNS.iter().collect(),
    };
    sources
        .into_iter()
        .map(|(label, pattern)| BiasPattern::new(*label, *pattern))
        .collect()
}

struct CompiledPattern {
    source: BiasPattern,
    regex: Regex,
}

pub struct BiasDetector {
    patterns: Vec<CompiledPattern>,
}

impl Default for BiasDetector {
    fn default() -> Self {
        Self::new(preset_patterns(BiasPreset::Standard))
    }
}

impl BiasDetector {
    /// Compile `patterns` in order. A pattern that fails to compile is
    /// skipped with a warning, so it can never flag a document.
    pub fn new(patterns: Vec<BiasPattern>) -> Self {
        let patterns = patterns
            .into_iter()
            .filter_map(|source| {
                match RegexBuilder::new(&source.pattern).case_insensitive(true).build() {
                    Ok(regex) => Some(CompiledPattern { source, regex }),
                    Err(e) => {
                        warn!("Skipping invalid bias pattern '{}' ({}): {}", source.pattern, source.label, e);
                        None
                    }
                }
            })
            .collect();

        Self { patterns }
    }

    pub fn from_config(config: &BiasConfig) -> Self {
        if config.preset == BiasPreset::Broad {
            warn!("Bias preset 'broad' flags bare numbers 45/50/60; expect false positives from phone numbers, prices and percentages");
        }
        // Preset first, then user patterns in config order
        let mut patterns = preset_patterns(config.preset);
        patterns.extend(config.extra_patterns.iter().cloned());

        let detector = Self::new(patterns);
        info!("Bias detector ready with {} pattern(s) ({} preset)", detector.pattern_count(), config.preset);
        detector
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// First pattern matching `text`; later patterns are not evaluated
    pub fn first_match(&self, text: &str) -> Option<&BiasPattern> {
        self.patterns
            .iter()
            .find(|compiled| compiled.regex.is_match(text))
            .map(|compiled| &compiled.source)
    }

    pub fn is_flagged(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// Findings for every `(name, text)` pair that matches, in input order
    pub fn detect_texts<'a, I>(&self, documents: I) -> Vec<BiasFinding>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        documents
            .into_iter()
            .filter_map(|(name, text)| {
                self.first_match(text).map(|pattern| {
                    debug!("{} flagged by '{}' ({})", name, pattern.label, pattern.pattern);
                    BiasFinding {
                        document: name.to_string(),
                        label: pattern.label.clone(),
                        pattern: pattern.pattern.clone(),
                    }
                })
            })
            .collect()
    }

    pub fn detect(&self, documents: &[Document]) -> Vec<BiasFinding> {
        self.detect_texts(documents.iter().map(|doc| (doc.name.as_str(), doc.content.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flagged_names(detector: &BiasDetector, docs: &[(&str, &str)]) -> Vec<String> {
        detector
            .detect_texts(docs.iter().copied())
            .into_iter()
            .map(|finding| finding.document)
            .collect()
    }

    #[test]
    fn test_dob_is_flagged_and_clean_text_is_not() {
        let detector = BiasDetector::default();
        let docs = [
            ("dob.txt", "Jane Roe\nDOB: 05/02/1978\nAccountant"),
            ("clean.txt", "Python developer with 5 years experience"),
        ];
        assert_eq!(flagged_names(&detector, &docs), vec!["dob.txt"]);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let detector = BiasDetector::default();
        assert!(detector.is_flagged("Date of Birth: 1 March 1970"));
        assert!(detector.is_flagged("date of birth withheld"));
        assert!(detector.is_flagged("DATE OF BIRTH"));
    }

    #[test]
    fn test_birth_year_and_age_statements() {
        let detector = BiasDetector::default();
        assert!(detector.is_flagged("Born in 1980, senior engineer"));
        assert!(detector.is_flagged("I am 52 years old"));
        assert!(detector.is_flagged("Age: 47"));
        assert!(detector.is_flagged("born March 3, 1969"));
        assert!(!detector.is_flagged("Managed a team of 50 engineers"));
    }

    #[test]
    fn test_first_match_short_circuits() {
        let detector = BiasDetector::default();
        let finding = detector
            .detect_texts([("r.txt", "Age: 61, born in 1963, date of birth on request")])
            .remove(0);
        assert_eq!(finding.label, "stated age");
    }

    #[test]
    fn test_broad_preset_flags_bare_numbers() {
        let broad = BiasDetector::new(preset_patterns(BiasPreset::Broad));
        let standard = BiasDetector::new(preset_patterns(BiasPreset::Standard));
        let text = "Managed a team of 50 engineers";

        assert!(broad.is_flagged(text));
        assert!(!standard.is_flagged(text));
        assert_eq!(broad.first_match(text).unwrap().label, "literal age");
    }

    #[test]
    fn test_basic_preset() {
        let basic = BiasDetector::new(preset_patterns(BiasPreset::Basic));
        assert!(basic.is_flagged("Certificate of birth available"));
        assert!(basic.is_flagged("15 yrs in retail"));
        assert!(!basic.is_flagged("Python developer with 5 years experience"));
    }

    #[test]
    fn test_invalid_pattern_never_flags() {
        let detector = BiasDetector::new(vec![
            BiasPattern::new("broken", r"(unclosed"),
            BiasPattern::new("retired", r"\bretired\b"),
        ]);
        assert_eq!(detector.pattern_count(), 1);
        assert!(!detector.is_flagged("(unclosed"));
        assert!(detector.is_flagged("Recently RETIRED nurse"));
    }

    #[test]
    fn test_extra_patterns_from_config() {
        let config = BiasConfig {
            preset: BiasPreset::Standard,
            extra_patterns: vec![BiasPattern::new("generation", r"\bbaby boomer\b")],
        };
        let detector = BiasDetector::from_config(&config);
        assert_eq!(detector.pattern_count(), STANDARD_PATTERNS.len() + 1);
        assert_eq!(detector.first_match("A proud Baby Boomer").unwrap().label, "generation");
    }

    #[test]
    fn test_empty_input_and_empty_text() {
        let detector = BiasDetector::default();
        assert!(detector.detect(&[]).is_empty());
        assert!(detector.detect(&[Document::resume("empty.txt", "")]).is_empty());
    }
}
