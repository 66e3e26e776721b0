//! Output formatters: console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::*;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering screening reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String>;
    fn format_bias(&self, bias: &BiasReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Plain console lines, optionally colored
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON for scripting
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Picks a formatter by `OutputFormat`
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            title.color(Color::Blue).bold().to_string()
        } else {
            title.to_string()
        }
    }

    fn score_color(score: f32) -> Color {
        match score {
            s if s >= 0.5 => Color::Green,
            s if s >= 0.2 => Color::Yellow,
            _ => Color::Red,
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();

        if let Some(message) = report.outcome.message() {
            output.push_str(&self.colorize(message, Color::Yellow));
            output.push('\n');
            return Ok(output);
        }

        for job_matches in &report.matches {
            output.push_str(&self.format_header(&format!(
                "Comparing all resumes to job description: {}",
                job_matches.job
            )));
            output.push_str("\n\n");

            for result in &job_matches.results {
                output.push_str(&format!(
                    "{} — Similarity Score: {}\n",
                    result.resume,
                    self.colorize(&format!("{:.2}", result.score), Self::score_color(result.score))
                ));

                match report.feedback_for(&result.resume, &result.job) {
                    Some(FeedbackOutcome::Feedback(text)) => {
                        output.push_str(&format!("  🔍 {}\n", self.colorize("Feedback:", Color::Cyan)));
                        for line in text.lines() {
                            output.push_str(&format!("    {}\n", line));
                        }
                    }
                    Some(FeedbackOutcome::Unavailable(reason)) => {
                        output.push_str(&format!(
                            "  {}\n",
                            self.colorize(&format!("Feedback unavailable: {}", reason), Color::BrightBlack)
                        ));
                    }
                    None => {}
                }
            }
            output.push('\n');
        }

        // Bias section last
        if let Some(bias) = &report.bias {
            output.push_str(&self.format_bias(bias)?);
        }

        Ok(output)
    }

    fn format_bias(&self, bias: &BiasReport) -> Result<String> {
        let mut output = String::new();
        if bias.is_clean() {
            output.push_str(&self.colorize("✅ No age-biased resumes detected.", Color::Green));
            output.push('\n');
        } else {
            output.push_str(&self.colorize("⚠️ Biased Resumes Detected (mentioning age):", Color::Red));
            output.push('\n');
            for finding in &bias.findings {
                output.push_str(&format!(" - {}\n", finding.document));
            }
        }
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        self.render(report)
    }

    fn format_bias(&self, bias: &BiasReport) -> Result<String> {
        self.render(bias)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut md = String::from("# Resume Screening Report\n\n");

        if self.include_metadata {
            md.push_str(&format!(
                "- **Generated:** {}\n- **Scorer:** {}\n- **Job selection:** {}\n\n",
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.scorer,
                report.job_selection
            ));
        }

        if let Some(message) = report.outcome.message() {
            md.push_str(&format!("> {}\n", message));
            return Ok(md);
        }

        for job_matches in &report.matches {
            md.push_str(&format!("## Job: `{}`\n\n", job_matches.job));
            md.push_str("| Resume | Similarity Score |\n|---|---|\n");
            for result in &job_matches.results {
                md.push_str(&format!("| {} | {:.2} |\n", result.resume, result.score));
            }
            md.push('\n');

            for result in &job_matches.results {
                if let Some(outcome) = report.feedback_for(&result.resume, &result.job) {
                    md.push_str(&format!("### Feedback for {}\n\n", result.resume));
                    match outcome {
                        FeedbackOutcome::Feedback(text) => md.push_str(text),
                        FeedbackOutcome::Unavailable(reason) => {
                            md.push_str(&format!("_Feedback unavailable: {}_", reason))
                        }
                    }
                    md.push_str("\n\n");
                }
            }
        }

        if let Some(bias) = &report.bias {
            md.push_str(&self.format_bias(bias)?);
        }

        Ok(md)
    }

    fn format_bias(&self, bias: &BiasReport) -> Result<String> {
        let mut md = String::from("## Age Bias Detection\n\n");
        if bias.is_clean() {
            md.push_str(&format!("No age-biased resumes detected ({} scanned).\n", bias.scanned));
        } else {
            md.push_str(&format!(
                "{} of {} resumes mention age:\n\n",
                bias.findings.len(),
                bias.scanned
            ));
            for finding in &bias.findings {
                md.push_str(&format!("- **{}** ({})\n", finding.document, finding.label));
            }
        }
        Ok(md)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true, true)
    }

    pub fn with_options(use_colors: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_report(&self, report: &ScreeningReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_report(report)
    }

    pub fn generate_bias_report(&self, bias: &BiasReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_bias(bias)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JobSelection;
    use crate::processing::bias::BiasFinding;
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_report() -> ScreeningReport {
        ScreeningReport {
            generated_at: Utc::now(),
            scorer: "lexical".to_string(),
            job_selection: JobSelection::All,
            outcome: ScreeningOutcome::Completed,
            matches: vec![JobMatches {
                job: "j1.txt".to_string(),
                results: vec![
                    SimilarityResult { resume: "r1.txt".to_string(), job: "j1.txt".to_string(), score: 0.4567 },
                    SimilarityResult { resume: "r2.txt".to_string(), job: "j1.txt".to_string(), score: 0.0 },
                ],
            }],
            feedback: vec![FeedbackEntry {
                resume: "r1.txt".to_string(),
                job: "j1.txt".to_string(),
                outcome: FeedbackOutcome::Feedback("Good match.".to_string()),
            }],
            bias: Some(BiasReport {
                scanned: 2,
                findings: vec![BiasFinding {
                    document: "r2.txt".to_string(),
                    label: "birth year".to_string(),
                    pattern: r"\bborn in \d{4}\b".to_string(),
                }],
            }),
        }
    }

    #[test]
    fn test_console_score_lines_and_bias_section() {
        let output = ConsoleFormatter::new(false).format_report(&sample_report()).unwrap();

        assert!(output.contains("Comparing all resumes to job description: j1.txt"));
        assert!(output.contains("r1.txt — Similarity Score: 0.46\n"));
        assert!(output.contains("r2.txt — Similarity Score: 0.00\n"));
        assert!(output.contains("Good match."));
        assert!(output.contains("⚠️ Biased Resumes Detected (mentioning age):\n - r2.txt\n"));
    }

    #[test]
    fn test_console_clean_bias_and_empty_outcome() {
        let formatter = ConsoleFormatter::new(false);
        let clean = BiasReport { scanned: 3, findings: vec![] };
        assert_eq!(formatter.format_bias(&clean).unwrap(), "✅ No age-biased resumes detected.\n");

        let empty = ScreeningReport::empty("lexical", JobSelection::All, ScreeningOutcome::NoJobDescriptions);
        let output = formatter.format_report(&empty).unwrap();
        assert_eq!(output, "No job descriptions found.\n");
    }

    #[test]
    fn test_json_round_trips_through_value() {
        let json = JsonFormatter::new(true).format_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["outcome"], "completed");
        assert_eq!(value["job_selection"], "all");
        assert_eq!(value["matches"][0]["results"][0]["resume"], "r1.txt");
        assert_eq!(value["feedback"][0]["outcome"]["status"], "feedback");
        assert_eq!(value["bias"]["findings"][0]["document"], "r2.txt");

        let parsed: ScreeningReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.matches, sample_report().matches);
    }

    #[test]
    fn test_markdown_report() {
        let md = MarkdownFormatter::new(false).format_report(&sample_report()).unwrap();
        assert!(md.starts_with("# Resume Screening Report\n\n## Job: `j1.txt`"));
        assert!(md.contains("| r1.txt | 0.46 |"));
        assert!(md.contains("### Feedback for r1.txt"));
        assert!(md.contains("- **r2.txt** (birth year)"));
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("run.md");
        save_report_to_file("content", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "content");
    }
}
