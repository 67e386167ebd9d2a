//! CLI interface for the match engine

use crate::config::OutputFormat;
use crate::input::file_detector::DocumentKind;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "remtch")]
#[command(about = "Resume-to-job match scoring")]
#[command(long_about = "Extract a candidate profile from a resume and score it against a job description using skill overlap and TF-IDF similarity")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a job description
    #[command(group(ArgGroup::new("job_source").required(true).args(["job", "job_text"])))]
    Match {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Job description text
        #[arg(long)]
        job_text: Option<String>,

        /// Resume kind: pdf or text (default: from extension)
        #[arg(short, long)]
        kind: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Abandon the request after this many seconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout_secs: Option<u64>,
    },

    /// Extract a candidate profile without scoring
    Parse {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Resume kind: pdf or text (default: from extension)
        #[arg(short, long)]
        kind: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// List the skill taxonomy
    Skills {
        /// Only show skills whose id or aliases contain this text
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Parse a `--kind` value
pub fn parse_document_kind(kind: &str) -> Result<DocumentKind, String> {
    DocumentKind::from_declared(kind).map_err(|e| e.to_string())
}
