//! Resume screener: similarity scoring and age-bias detection for resumes

use clap::Parser;
use log::{error, info};
use resume_screener::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use resume_screener::config::{Config, OutputFormat};
use resume_screener::error::{Result, ScreenerError};
use resume_screener::input::InputManager;
use resume_screener::llm::{FeedbackProvider, GeminiClient};
use resume_screener::output::report::BiasReport;
use resume_screener::output::{save_report_to_file, ReportGenerator};
use resume_screener::processing::bias::BiasDetector;
use resume_screener::processing::document::{Document, DocumentType};
use resume_screener::processing::embedding_manager::EmbeddingModelManager;
use resume_screener::processing::screener::{feedback_spinner, Screener};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // The feedback API key may live in a .env file
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded environment from {}", path.display());
    }

    // Load configuration
    let config = match Config::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Screen {
            resumes,
            jobs,
            strategy,
            select,
            feedback,
            sort,
            output,
            save,
        } => {
            // Command line flags override the config file
            if let Some(resumes) = resumes {
                config.input.resumes_dir = resumes;
            }
            if let Some(jobs) = jobs {
                config.input.jobs_dir = jobs;
            }
            if let Some(strategy) = strategy {
                config.scoring.strategy = strategy;
            }
            if let Some(select) = select {
                config.screening.job_selection = select;
            }
            if let Some(output) = output {
                config.output.format = output;
            }
            config.feedback.enabled |= feedback;
            config.output.sort_by_score |= sort;

            let format = config.output.format;
            let mut loader = input_manager(&config);
            let mut screener = Screener::from_config(&config)
                .await?
                .with_progress(format == OutputFormat::Console);

            // Prompts go to stderr so stdout carries only the report
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut prompt = std::io::stderr();
            let report = screener
                .screen_directories(
                    &mut loader,
                    &config.input.resumes_dir,
                    &config.input.jobs_dir,
                    &mut input,
                    &mut prompt,
                )
                .await?;

            let generator = ReportGenerator::with_options(config.output.color_output, true, true);
            println!("{}", generator.generate_report(&report, format)?);

            // Saved reports never carry color codes
            if let Some(path) = save {
                let plain = ReportGenerator::with_options(false, true, true);
                save_report_to_file(&plain.generate_report(&report, format)?, &path)?;
                info!("Report saved to {}", path.display());
            }
        }

        Commands::Bias { resumes, output } => {
            let resumes_dir = resumes.unwrap_or_else(|| config.input.resumes_dir.clone());
            let format = output.unwrap_or(config.output.format);

            let mut loader = input_manager(&config);
            let documents = loader.load_directory(&resumes_dir, DocumentType::Resume).await?;
            let detector = BiasDetector::from_config(&config.bias);
            let bias = BiasReport {
                scanned: documents.len(),
                findings: detector.detect(&documents),
            };

            let generator = ReportGenerator::with_options(config.output.color_output, true, true);
            println!("{}", generator.generate_bias_report(&bias, format)?);
        }

        Commands::Feedback { resume, job } => {
            let (resume_doc, job_doc) = load_pair(&config, &resume, &job).await?;
            let client = GeminiClient::from_config(&config.feedback)?;

            let spinner = feedback_spinner(&resume_doc.name, &job_doc.name);
            let result = client.generate_feedback(&resume_doc.content, &job_doc.content).await;
            spinner.finish_and_clear();

            println!("🔍 Resume Review for {} (Job: {})\n", resume_doc.name, job_doc.name);
            println!("{}", result?);
        }

        Commands::Ask { resume, job, question } => {
            let (resume_doc, job_doc) = load_pair(&config, &resume, &job).await?;
            let client = GeminiClient::from_config(&config.feedback)?;

            let spinner = feedback_spinner(&resume_doc.name, &job_doc.name);
            let result = client
                .answer_question(&resume_doc.content, &job_doc.content, &question)
                .await;
            spinner.finish_and_clear();

            println!("Answer: {}", result?);
        }

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;
            match action {
                ModelAction::List => {
                    println!("🧠 Embedding Models\n");
                    for (id, model) in manager.list_available_models() {
                        let status = if manager.is_model_downloaded(id) { "✅ Downloaded" } else { "⬇️  Available" };
                        println!("  • {} ({}) - {} MB, {} dims [{}]", id, model.repo_id, model.size_mb, model.dimensions, status);
                        println!("    {}", model.description);
                    }
                    println!("\nModels directory: {}", config.models_dir().display());
                }

                ModelAction::Download { model, force } => {
                    // Accept an id, repo id or display name
                    let model_id = manager
                        .resolve_model_id(&model)
                        .ok_or_else(|| ScreenerError::ModelNotFound(model.clone()))?;
                    if !force && manager.is_model_downloaded(&model_id) {
                        println!("✅ Model '{}' is already downloaded (use --force to re-download)", model_id);
                        return Ok(());
                    }
                    let path = manager.download_model(&model_id, force).await?;
                    println!("✅ Model '{}' downloaded to {}", model_id, path.display());
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("{}", config.to_toml()?);
            }

            Some(ConfigAction::Reset) => {
                let path = config_path.unwrap_or_else(Config::config_path);
                Config::default().save_to(&path)?;
                println!("✅ Configuration reset: {}", path.display());
            }

            Some(ConfigAction::Path) => {
                let path = config_path.unwrap_or_else(Config::config_path);
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}

fn input_manager(config: &Config) -> InputManager {
    InputManager::new()
        .with_extensions(config.input.extensions.clone())
        .with_normalization(config.input.normalize_text)
}

async fn load_pair(config: &Config, resume: &Path, job: &Path) -> Result<(Document, Document)> {
    cli::validate_file_extension(resume, &["pdf", "txt", "md"])
        .map_err(|e| ScreenerError::InvalidInput(format!("Resume file: {}", e)))?;
    cli::validate_file_extension(job, &["pdf", "txt", "md"])
        .map_err(|e| ScreenerError::InvalidInput(format!("Job description file: {}", e)))?;

    let mut loader = input_manager(config);
    let resume_doc = loader.load_document(resume, DocumentType::Resume).await?;
    let job_doc = loader.load_document(job, DocumentType::JobDescription).await?;
    Ok((resume_doc, job_doc))
}
