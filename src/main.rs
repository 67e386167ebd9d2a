//! remtch: resume-to-job match scoring from the command line

use clap::Parser;
use colored::Colorize;
use log::{error, info};
use remtch::cli::{self, Cli, Commands, ConfigAction};
use remtch::config::{Config, OutputFormat};
use remtch::error::{RemtchError, Result};
use remtch::input::InputManager;
use remtch::output::formatter::{save_report_to_file, ReportGenerator};
use remtch::processing::MatchEngine;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let json_errors = wants_json(&cli.command, &config);

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.config).await {
        report_failure(&e, json_errors);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Match {
            resume,
            job,
            job_text,
            kind,
            output,
            save,
            timeout_secs,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let kind = kind
                .as_deref()
                .map(cli::parse_document_kind)
                .transpose()
                .map_err(RemtchError::InvalidInput)?;

            let manager = InputManager::new(config.extraction.max_payload_bytes);
            let job_description = match (job, job_text) {
                (Some(path), _) => manager.load_text(&path).await?,
                (None, Some(text)) => text,
                (None, None) => {
                    return Err(RemtchError::InvalidInput(
                        "Provide --job or --job-text".to_string(),
                    ))
                }
            };
            if job_description.trim().is_empty() {
                return Err(RemtchError::EmptyJobDescription);
            }

            info!("Scoring {} against the job description", resume.display());
            let document = manager.load(&resume, kind).await?;
            let engine = MatchEngine::from_config(&config)?;

            let timeout = timeout_secs.unwrap_or(config.runtime.timeout_secs);
            let result = run_with_timeout(timeout, move || {
                engine.match_document(&document, &job_description)
            })
            .await?;

            let generator = ReportGenerator::with_options(config.output.color_output && save.is_none(), true);
            let rendered = generator.generate_match(&result, format)?;
            emit(&rendered, save.as_deref())?;
        }

        Commands::Parse {
            resume,
            kind,
            output,
            save,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let kind = kind
                .as_deref()
                .map(cli::parse_document_kind)
                .transpose()
                .map_err(RemtchError::InvalidInput)?;

            let manager = InputManager::new(config.extraction.max_payload_bytes);
            let document = manager.load(&resume, kind).await?;
            let engine = MatchEngine::from_config(&config)?;

            let profile = run_with_timeout(config.runtime.timeout_secs, move || {
                engine.parse_document(&document)
            })
            .await?;

            let generator = ReportGenerator::with_options(config.output.color_output && save.is_none(), true);
            let rendered = generator.generate_profile(&profile, format)?;
            emit(&rendered, save.as_deref())?;
        }

        Commands::Skills { filter } => {
            let engine = MatchEngine::from_config(&config)?;
            let taxonomy = engine.taxonomy();
            let filter = filter.map(|f| f.to_lowercase());
            // an exact alias such as "k8s" also selects its canonical entry
            let resolved = filter.as_deref().and_then(|f| taxonomy.canonicalize(f));

            println!(
                "Skill taxonomy {} ({} skills, {} aliases)\n",
                taxonomy.version().bold(),
                taxonomy.skill_count(),
                taxonomy.alias_count()
            );

            for entry in taxonomy.entries() {
                let shown = match &filter {
                    Some(f) => {
                        resolved == Some(entry.canonical.as_str())
                            || entry.canonical.contains(f.as_str())
                            || entry.aliases.iter().any(|a| a.contains(f.as_str()))
                    }
                    None => true,
                };
                if shown {
                    println!("  • {} ({})", entry.canonical.cyan(), entry.aliases.join(", "));
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| RemtchError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("{}", content);
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

/// Run engine work on the blocking pool and abandon it after `secs`.
async fn run_with_timeout<T, F>(secs: u64, work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(work);

    match tokio::time::timeout(Duration::from_secs(secs), task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(anyhow::anyhow!("Engine task failed: {}", join_error).into()),
        Err(_) => Err(RemtchError::Timeout(secs)),
    }
}

fn resolve_format(output: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match output {
        Some(format) => cli::parse_output_format(format).map_err(RemtchError::InvalidInput),
        None => Ok(config.output.format),
    }
}

fn wants_json(command: &Commands, config: &Config) -> bool {
    let requested = match command {
        Commands::Match { output, .. } | Commands::Parse { output, .. } => output.as_deref(),
        _ => return false,
    };

    match requested {
        Some(format) => matches!(cli::parse_output_format(format), Ok(OutputFormat::Json)),
        None => config.output.format == OutputFormat::Json,
    }
}

fn emit(content: &str, save: Option<&Path>) -> Result<()> {
    match save {
        Some(path) => {
            save_report_to_file(content, path)?;
            println!("💾 Saved to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn report_failure(err: &RemtchError, json: bool) {
    if json {
        match serde_json::to_string_pretty(&err.to_response()) {
            Ok(body) => println!("{}", body),
            Err(_) => eprintln!("{}", err),
        }
    } else {
        eprintln!("{} {}", "Error:".red().bold(), err);
    }
}
