//! Daemon configuration from environment variables

use anyhow::{bail, Context, Result};
use nowcast_export::{ExportSettings, DEFAULT_EXPORT_LIMIT, DEFAULT_EXPORT_PATH};
use nowcast_obs::LogFormat;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// SQLite connection URL
    pub database_url: String,

    /// Time between polls (default: 60s)
    pub poll_interval: Duration,

    /// Spreadsheet destination and row count
    pub export: ExportSettings,

    /// Log line layout (default: pretty)
    pub log_format: LogFormat,

    /// Saved provider response to poll instead of the network
    pub replay_file: Option<PathBuf>,
}

impl DaemonConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").context("DATABASE_URL environment variable not set")?;

        let poll_seconds: u64 = lookup("POLL_INTERVAL")
            .unwrap_or_else(|| "60".to_string())
            .parse()
            .context("Invalid POLL_INTERVAL")?;
        if poll_seconds == 0 {
            bail!("POLL_INTERVAL must be a positive number of seconds");
        }

        let export_path = lookup("EXPORT_PATH").unwrap_or_else(|| DEFAULT_EXPORT_PATH.to_string());

        let export_limit = match lookup("EXPORT_LIMIT") {
            Some(value) => value.parse::<u32>().context("Invalid EXPORT_LIMIT")?,
            None => DEFAULT_EXPORT_LIMIT,
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(value) => value
                .parse::<LogFormat>()
                .map_err(anyhow::Error::msg)
                .context("Invalid LOG_FORMAT")?,
            None => LogFormat::default(),
        };

        let replay_file = lookup("REPLAY_FILE").map(PathBuf::from);

        Ok(Self {
            database_url,
            poll_interval: Duration::from_secs(poll_seconds),
            export: ExportSettings {
                path: PathBuf::from(export_path),
                limit: export_limit,
            },
            log_format,
            replay_file,
        })
    }
}
