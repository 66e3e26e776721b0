//! Integration tests for the resume screener

use resume_screener::config::{Config, JobSelection, OutputFormat};
use resume_screener::input::InputManager;
use resume_screener::output::report::ScreeningOutcome;
use resume_screener::output::ReportGenerator;
use resume_screener::processing::bias::BiasDetector;
use resume_screener::processing::document::DocumentType;
use resume_screener::processing::scorer::LexicalScorer;
use resume_screener::processing::screener::Screener;
use resume_screener::ScreenerError;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

fn data_dirs() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let resumes = temp_dir.path().join("resumes");
    let jobs = temp_dir.path().join("job_descriptions");

    write(&resumes, "r2.txt", "Born in 1980, senior engineer");
    write(&resumes, "r1.txt", "Python developer with 5 years experience");
    write(&resumes, "notes.md", "# not a resume");
    write(&jobs, "j1.txt", "Looking for a Python developer");
    temp_dir
}

#[tokio::test]
async fn test_load_directory_returns_sorted_txt_documents() {
    let temp_dir = data_dirs();
    let mut manager = InputManager::new();

    let documents = manager
        .load_directory(&temp_dir.path().join("resumes"), DocumentType::Resume)
        .await
        .unwrap();

    let names: Vec<&str> = documents.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["r1.txt", "r2.txt"]);
    assert_eq!(documents[0].content, "Python developer with 5 years experience");
    assert_eq!(documents[0].document_type, DocumentType::Resume);
}

#[tokio::test]
async fn test_load_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = InputManager::new();

    let result = manager
        .load_directory(&temp_dir.path().join("absent"), DocumentType::JobDescription)
        .await;
    assert!(matches!(result, Err(ScreenerError::Io(_))));
}

#[tokio::test]
async fn test_normalization_and_caching() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "cv.txt", "Senior  Engineer!\n(C++)");
    let path = temp_dir.path().join("cv.txt");

    let mut manager = InputManager::new().with_normalization(true);
    let first = manager.extract_text(&path).await.unwrap();
    let second = manager.extract_text(&path).await.unwrap();

    assert_eq!(first, "senior engineer c");
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);
}

#[tokio::test]
async fn test_unsupported_and_missing_files() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "cv.xyz", "text");
    let mut manager = InputManager::new();

    let unsupported = manager.extract_text(&temp_dir.path().join("cv.xyz")).await;
    assert!(matches!(unsupported, Err(ScreenerError::UnsupportedFormat(_))));

    let missing = manager.extract_text(&temp_dir.path().join("nope.txt")).await;
    assert!(matches!(missing, Err(ScreenerError::InvalidInput(_))));
}

#[tokio::test]
async fn test_screen_directories_end_to_end() {
    let temp_dir = data_dirs();
    let mut manager = InputManager::new();
    let mut screener = Screener::new(Box::new(LexicalScorer::new()), BiasDetector::default());
    let mut input = Cursor::new(Vec::<u8>::new());
    let mut output: Vec<u8> = Vec::new();

    let report = screener
        .screen_directories(
            &mut manager,
            &temp_dir.path().join("resumes"),
            &temp_dir.path().join("job_descriptions"),
            &mut input,
            &mut output,
        )
        .await
        .unwrap();

    assert_eq!(report.outcome, ScreeningOutcome::Completed);
    let results = &report.matches[0].results;
    assert_eq!(results[0].resume, "r1.txt");
    assert!(results[0].score > 0.0);
    assert_eq!(results[1].score, 0.0);
    assert_eq!(report.bias.as_ref().unwrap().flagged_names(), vec!["r2.txt"]);

    let console = ReportGenerator::with_options(false, true, true)
        .generate_report(&report, OutputFormat::Console)
        .unwrap();
    assert!(console.contains("Comparing all resumes to job description: j1.txt"));
    assert!(console.contains("r2.txt — Similarity Score: 0.00"));
    assert!(console.contains(" - r2.txt"));
}

#[tokio::test]
async fn test_empty_jobs_directory_reports_without_scoring() {
    let temp_dir = data_dirs();
    let empty_jobs = temp_dir.path().join("empty");
    fs::create_dir_all(&empty_jobs).unwrap();

    let mut manager = InputManager::new();
    let mut screener = Screener::new(Box::new(LexicalScorer::new()), BiasDetector::default());
    let report = screener
        .screen_directories(
            &mut manager,
            &temp_dir.path().join("resumes"),
            &empty_jobs,
            &mut Cursor::new(Vec::<u8>::new()),
            &mut Vec::<u8>::new(),
        )
        .await
        .unwrap();

    assert_eq!(report.outcome, ScreeningOutcome::NoJobDescriptions);
    assert_eq!(report.comparison_count(), 0);
}

#[tokio::test]
async fn test_screener_from_default_config() {
    let mut config = Config::default();
    config.screening.job_selection = JobSelection::First;

    let screener = Screener::from_config(&config).await.unwrap();
    assert_eq!(screener.scorer_name(), "lexical");
}

#[tokio::test]
async fn test_interactive_prompts_stay_out_of_json_report() {
    let temp_dir = data_dirs();
    write(&temp_dir.path().join("job_descriptions"), "j2.txt", "Pottery instructor");

    let mut manager = InputManager::new();
    let mut screener = Screener::new(Box::new(LexicalScorer::new()), BiasDetector::default())
        .with_job_selection(JobSelection::Interactive);
    let mut input = Cursor::new(b"2\n".to_vec());
    let mut prompt: Vec<u8> = Vec::new();

    let report = screener
        .screen_directories(
            &mut manager,
            &temp_dir.path().join("resumes"),
            &temp_dir.path().join("job_descriptions"),
            &mut input,
            &mut prompt,
        )
        .await
        .unwrap();

    let prompt = String::from_utf8(prompt).unwrap();
    assert!(prompt.contains("Available job descriptions:"));
    assert!(prompt.contains("  2. j2.txt"));

    let json = ReportGenerator::with_options(false, true, true)
        .generate_report(&report, OutputFormat::Json)
        .unwrap();
    assert!(!json.contains("Select a job description"));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["matches"][0]["job"], "j2.txt");
}
