/// CLI entry point for headless batch filing
use crate::{
    ai::{create_completion_client, Classifier, PromptLanguage},
    automation::{BatchOrchestrator, BatchReport, FileOutcome},
    config::Config,
    core::{LopdfReader, TaxonomyStore, TesseractEngine, TextExtractor},
    error::{AppError, Result},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub enum CliCommand {
    Run {
        inbox: Option<PathBuf>,
        output: Option<PathBuf>,
        json: bool,
    },
    Classify {
        path: PathBuf,
    },
    Taxonomy {
        output: Option<PathBuf>,
    },
}

pub struct CliApp {
    config: Config,
}

impl CliApp {
    /// Initialize logging, `.env` and configuration
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        // Initialize logging for CLI
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "docfiler=info".into()),
            )
            .try_init();

        // Load environment variables before the config reads its overrides
        dotenv::dotenv().ok();

        let config = Config::load(config_path)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute a CLI command
    pub async fn execute(&self, command: CliCommand) -> Result<()> {
        match command {
            CliCommand::Run {
                inbox,
                output,
                json,
            } => {
                let config = with_overrides(&self.config, inbox, output);
                config.validate()?;
                let report = run_batch(&config).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print_summary(&report);
                }
            }

            CliCommand::Classify { path } => {
                self.config.validate()?;
                if !path.is_file() {
                    return Err(AppError::InvalidInput {
                        message: format!("Not a file: {}", path.display()),
                    });
                }

                info!("Classifying {}", path.display());
                let taxonomy = TaxonomyStore::initialize(&self.config.output_dir).await?;

                let mut extractor = TextExtractor::new(
                    Arc::new(TesseractEngine::new()),
                    self.config.ocr_language.clone(),
                    Arc::new(LopdfReader),
                );
                let text = extractor.extract(&path).await?;
                extractor.finish()?;

                let classifier = Classifier::new(
                    create_completion_client(&self.config)?,
                    PromptLanguage::parse(&self.config.prompt_language)?,
                );
                let result = classifier.classify(&text, &taxonomy).await?;
                println!("{}", serde_json::to_string_pretty(&result)?);
            }

            CliCommand::Taxonomy { output } => {
                let config = with_overrides(&self.config, None, output);
                let taxonomy = TaxonomyStore::initialize(&config.output_dir).await?;

                println!("Groups ({}):", taxonomy.groups().len());
                for group in taxonomy.groups() {
                    println!("  {}", group);
                }
                println!("Subgroups ({}):", taxonomy.subgroups().len());
                for subgroup in taxonomy.subgroups() {
                    println!("  {}", subgroup);
                }
            }
        }

        Ok(())
    }
}

/// Apply `--inbox` / `--output` on top of the loaded configuration
fn with_overrides(config: &Config, inbox: Option<PathBuf>, output: Option<PathBuf>) -> Config {
    let mut config = config.clone();
    if let Some(inbox) = inbox {
        config.inbox_dir = inbox;
    }
    if let Some(output) = output {
        config.output_dir = output;
    }
    config
}

async fn run_batch(config: &Config) -> Result<BatchReport> {
    let mut orchestrator = BatchOrchestrator::from_config(
        config,
        create_completion_client(config)?,
        Arc::new(TesseractEngine::new()),
        Arc::new(LopdfReader),
    )?;

    orchestrator.organizer().ensure_output_root().await?;
    let mut taxonomy = TaxonomyStore::initialize(&config.output_dir).await?;
    info!(
        "Starting with {} groups and {} subgroups",
        taxonomy.groups().len(),
        taxonomy.subgroups().len()
    );

    orchestrator.run(&mut taxonomy).await
}

fn print_summary(report: &BatchReport) {
    for outcome in &report.outcomes {
        match outcome {
            FileOutcome::Filed {
                file, destination, ..
            } => println!("✓ {} → {}", file, destination.display()),
            FileOutcome::Abandoned {
                file,
                attempts,
                error,
            } => println!("✗ {} ({} attempts): {}", file, attempts, error.message),
        }
    }

    println!(
        "\nFiled {} of {} files ({} left in inbox)",
        report.filed(),
        report.outcomes.len(),
        report.abandoned()
    );
}
