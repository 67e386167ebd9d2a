//! Configuration management for the match engine and CLI

use crate::error::{Result, RemtchError};
use crate::processing::engine::DEFAULT_MAX_PAYLOAD_BYTES;
use crate::processing::taxonomy::SkillEntry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub profile: ProfileConfig,
    pub taxonomy: TaxonomyConfig,
    pub output: OutputConfig,
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub max_payload_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Upper bound on tokens in a name line
    pub name_max_tokens: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    #[serde(default)]
    pub custom_skills: Vec<SkillEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig {
                max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            },
            profile: ProfileConfig { name_max_tokens: 5 },
            taxonomy: TaxonomyConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
            },
            runtime: RuntimeConfig { timeout_secs: 30 },
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location. A missing default file
    /// is created with defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let config_path = Self::config_path();
                if config_path.exists() {
                    Self::load_from(&config_path)?
                } else {
                    let config = Self::default();
                    config.save_to(&config_path)?;
                    config
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RemtchError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| RemtchError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.extraction.max_payload_bytes == 0 {
            return Err(RemtchError::Configuration(
                "extraction.max_payload_bytes must be greater than zero".to_string(),
            ));
        }
        if !(2..=10).contains(&self.profile.name_max_tokens) {
            return Err(RemtchError::Configuration(format!(
                "profile.name_max_tokens must be between 2 and 10, got {}",
                self.profile.name_max_tokens
            )));
        }
        if self.runtime.timeout_secs == 0 {
            return Err(RemtchError::Configuration(
                "runtime.timeout_secs must be greater than zero".to_string(),
            ));
        }
        for entry in &self.taxonomy.custom_skills {
            if entry.canonical.trim().is_empty() {
                return Err(RemtchError::Configuration(
                    "taxonomy.custom_skills entries need a canonical id".to_string(),
                ));
            }
            if entry.aliases.iter().any(|alias| alias.trim().is_empty()) {
                return Err(RemtchError::Configuration(format!(
                    "custom skill '{}' has an empty alias",
                    entry.canonical
                )));
            }
        }
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("remtch")
            .join("config.toml")
    }
}
