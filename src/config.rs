//! Configuration management for the resume screener

use crate::error::{Result, ScreenerError};
use crate::processing::bias::BiasPattern;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub scoring: ScoringConfig,
    pub bias: BiasConfig,
    pub screening: ScreeningConfig,
    pub feedback: FeedbackConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub resumes_dir: PathBuf,
    pub jobs_dir: PathBuf,
    /// File extensions picked up when loading a directory
    pub extensions: Vec<String>,
    /// Strip punctuation and lowercase documents at load time
    pub normalize_text: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub strategy: ScoringStrategy,
    pub embedding_model: String,
    pub models_dir: PathBuf,
    pub fallback_to_lexical: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasConfig {
    pub preset: BiasPreset,
    pub extra_patterns: Vec<BiasPattern>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    pub job_selection: JobSelection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub enabled: bool,
    pub model: String,
    pub endpoint: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub sort_by_score: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStrategy {
    Lexical,
    Embedding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasPreset {
    /// Explicit age and birth-date disclosures
    Standard,
    /// Standard plus bare literal ages (45, 50, 60); high false-positive rate
    Broad,
    /// First-generation keyword list
    Basic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobSelection {
    All,
    First,
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            resumes_dir: PathBuf::from("data/resumes"),
            jobs_dir: PathBuf::from("data/job_descriptions"),
            extensions: vec!["txt".to_string()],
            normalize_text: false,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-screener")
            .join("models");

        Self {
            strategy: ScoringStrategy::Lexical,
            embedding_model: "potion-base-8M".to_string(),
            models_dir,
            fallback_to_lexical: true,
        }
    }
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            preset: BiasPreset::Standard,
            extra_patterns: Vec::new(),
        }
    }
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            job_selection: JobSelection::All,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "gemini-1.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            sort_by_score: false,
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the default location.
    ///
    /// A missing default file is created with default values. A missing
    /// explicit file is an error.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ScreenerError::Configuration(format!(
                        "Config file does not exist: {}",
                        path.display()
                    )));
                }
                Self::read(path)
            }
            None => {
                let config_path = Self::config_path();
                if config_path.exists() {
                    Self::read(&config_path)
                } else {
                    let config = Self::default();
                    if let Err(e) = config.save_to(&config_path) {
                        warn!("Could not write default config to {}: {}", config_path.display(), e);
                    }
                    Ok(config)
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to serialize config: {}", e)))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.scoring.models_dir
    }
}

macro_rules! lowercase_enum_text {
    ($ty:ty, $what:literal, { $($variant:path => $text:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let text = match self {
                    $($variant => $text,)+
                };
                f.write_str(text)
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($text => Ok($variant),)+
                    _ => Err(format!(
                        "Invalid {}: {}. Supported: {}",
                        $what,
                        s,
                        [$($text),+].join(", ")
                    )),
                }
            }
        }
    };
}

lowercase_enum_text!(ScoringStrategy, "scoring strategy", {
    ScoringStrategy::Lexical => "lexical",
    ScoringStrategy::Embedding => "embedding",
});

lowercase_enum_text!(BiasPreset, "bias preset", {
    BiasPreset::Standard => "standard",
    BiasPreset::Broad => "broad",
    BiasPreset::Basic => "basic",
});

lowercase_enum_text!(JobSelection, "job selection mode", {
    JobSelection::All => "all",
    JobSelection::First => "first",
    JobSelection::Interactive => "interactive",
});

lowercase_enum_text!(OutputFormat, "output format", {
    OutputFormat::Console => "console",
    OutputFormat::Json => "json",
    OutputFormat::Markdown => "markdown",
});

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [scoring]
            strategy = "embedding"

            [bias]
            preset = "broad"
            extra_patterns = [{ label = "retired", pattern = "\\bretired\\b" }]
            "#,
        )
        .unwrap();

        assert_eq!(config.scoring.strategy, ScoringStrategy::Embedding);
        assert!(config.scoring.fallback_to_lexical);
        assert_eq!(config.bias.preset, BiasPreset::Broad);
        assert_eq!(config.bias.extra_patterns.len(), 1);
        assert_eq!(config.bias.extra_patterns[0].label, "retired");
        assert_eq!(config.screening.job_selection, JobSelection::All);
        assert_eq!(config.input.extensions, vec!["txt".to_string()]);
        assert_eq!(config.feedback.api_key_env, "GOOGLE_API_KEY");
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.output.sort_by_score = true;
        config.screening.job_selection = JobSelection::First;
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(Some(&path)).unwrap();
        assert!(reloaded.output.sort_by_score);
        assert_eq!(reloaded.screening.job_selection, JobSelection::First);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from(Some(&temp_dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ScreenerError::Configuration(_))));
    }

    #[test]
    fn test_malformed_config_is_error() {
        let result = Config::from_toml("[scoring]\nstrategy = \"quantum\"\n");
        assert!(matches!(result, Err(ScreenerError::Configuration(_))));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Lexical".parse::<ScoringStrategy>(), Ok(ScoringStrategy::Lexical));
        assert_eq!("interactive".parse::<JobSelection>(), Ok(JobSelection::Interactive));
        assert!("html".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
        assert!("nope".parse::<BiasPreset>().unwrap_err().contains("standard, broad, basic"));
    }
}
