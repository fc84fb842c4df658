//! Runtime configuration: CLI flags, environment, optional YAML file.
//!
//! Precedence is flag or environment variable, then config file, then the
//! built-in default.

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ADMIN_URL: &str = "http://localhost:8080";
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_REFRESH_MS: u64 = 2000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Command line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "wm-admin-tui")]
#[command(author, version, about = "Browse captured traffic and manage stub mappings")]
pub struct Args {
    /// Admin server URL
    #[arg(short, long, env = "WM_ADMIN_URL")]
    pub admin_url: Option<String>,

    /// Path prefix of the admin API (`/__admin` to talk to the mock server directly)
    #[arg(short = 'p', long, env = "WM_ADMIN_API_PREFIX")]
    pub api_prefix: Option<String>,

    /// Auto refresh interval in milliseconds, 0 disables
    #[arg(short, long)]
    pub refresh_ms: Option<u64>,

    /// HTTP request timeout in seconds
    #[arg(short, long)]
    pub timeout_secs: Option<u64>,

    /// YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log file (default: <cache dir>/wm-admin-tui/wm-admin-tui.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Disable logging
    #[arg(long)]
    pub no_log: bool,
}

/// Keys accepted in the config file
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    pub admin_url: Option<String>,
    pub api_prefix: Option<String>,
    pub refresh_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub no_log: Option<bool>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub admin_url: String,
    pub api_prefix: String,
    /// `None` when auto refresh is off
    pub refresh_interval: Option<Duration>,
    pub timeout: Duration,
    /// `None` when logging is off
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admin_url: DEFAULT_ADMIN_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            refresh_interval: refresh_interval(DEFAULT_REFRESH_MS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Parse the process arguments and resolve
    pub fn load() -> anyhow::Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        let config = Self::merge(args, file);
        config.validate()?;
        Ok(config)
    }

    fn merge(args: Args, file: FileConfig) -> Self {
        let refresh_ms = args
            .refresh_ms
            .or(file.refresh_ms)
            .unwrap_or(DEFAULT_REFRESH_MS);
        let timeout_secs = args
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let log_file = if args.no_log || file.no_log.unwrap_or(false) {
            None
        } else {
            args.log_file.or(file.log_file).or_else(default_log_file)
        };

        Self {
            admin_url: args
                .admin_url
                .or(file.admin_url)
                .unwrap_or_else(|| DEFAULT_ADMIN_URL.to_string()),
            api_prefix: args
                .api_prefix
                .or(file.api_prefix)
                .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string()),
            refresh_interval: refresh_interval(refresh_ms),
            timeout: Duration::from_secs(timeout_secs),
            log_file,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.admin_url.starts_with("http://") || self.admin_url.starts_with("https://")) {
            anyhow::bail!(
                "Admin URL must start with http:// or https://, got '{}'",
                self.admin_url
            );
        }

        if !self.api_prefix.starts_with('/') {
            anyhow::bail!(
                "API prefix must start with '/', got '{}'",
                self.api_prefix
            );
        }

        if self.timeout.is_zero() {
            anyhow::bail!("Request timeout must be at least one second");
        }

        Ok(())
    }
}

fn refresh_interval(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

fn default_log_file() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("wm-admin-tui").join("wm-admin-tui.log"))
}
