//! Optional TOML configuration file.
//!
//! Values here are defaults: a command-line flag always wins, and a format
//! spec's own settings win over the file.
//!
//! ```toml
//! timezone = "America/Chicago"
//! sample_rows = 10
//! schema_path = "schemas/incident.json"
//! strict = false
//! output_format = "json"
//! date_formats = ["%d%b%Y"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ems_ingest::DEFAULT_SAMPLE_ROWS;
use ems_transform::OutputFormat;
use serde::Deserialize;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "EMS_FORMATTER_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Source time zone for values without an offset.
    pub timezone: Option<String>,
    pub sample_rows: Option<usize>,
    /// Relative paths resolve against the config file's directory.
    pub schema_path: Option<PathBuf>,
    pub strict: Option<bool>,
    pub output_format: Option<String>,
    /// Extra date/time patterns tried after a spec's own.
    pub date_formats: Vec<String>,
}

impl Config {
    /// Parses config text and checks the values that have a fixed vocabulary.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("parse config")?;
        config.output_format()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let mut config = Self::parse(&text)
            .with_context(|| format!("load config file {}", path.display()))?;
        if let (Some(schema), Some(dir)) = (&config.schema_path, path.parent())
            && schema.is_relative()
        {
            config.schema_path = Some(dir.join(schema));
        }
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Loads `path` when given, else returns the built-in defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn output_format(&self) -> Result<Option<OutputFormat>> {
        self.output_format
            .as_deref()
            .map(|value| {
                value
                    .parse::<OutputFormat>()
                    .map_err(|message| anyhow::anyhow!("output_format: {message}"))
            })
            .transpose()
    }

    pub fn sample_rows(&self) -> usize {
        self.sample_rows.unwrap_or(DEFAULT_SAMPLE_ROWS)
    }
}
