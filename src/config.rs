//! Layered console configuration.
//!
//! Sources, lowest priority first:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config`)
//! 3. `FRAUDWATCH_*` environment variables, nested with `__`
//!    (`FRAUDWATCH_BACKEND__URL`, `FRAUDWATCH_STREAM__TRANSACTIONS`)
//! 4. command-line overrides
//!
//! ```toml
//! analyst = "analyst-7"
//! download_dir = "exports"
//!
//! [backend]
//! url = "http://fraud-api.internal:5001"
//! timeout = "10s"
//!
//! [stream]
//! transactions = "2s"
//! stats = "4s"
//! alerts = "5s"
//! autostart = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use crate::data::duration::serde_interval;
use crate::data::RiskThresholds;

const ENV_PREFIX: &str = "FRAUDWATCH";

/// Everything the console reads at start-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub backend: BackendSettings,
    pub stream: StreamSettings,
    pub notifications: NotificationSettings,
    pub risk: RiskThresholds,
    /// User id sent when assigning alerts.
    pub analyst: String,
    /// Where exported files are saved. Without one, only the link is shown.
    pub download_dir: Option<PathBuf>,
    pub log_file: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend: BackendSettings::default(),
            stream: StreamSettings::default(),
            notifications: NotificationSettings::default(),
            risk: RiskThresholds::default(),
            analyst: "analyst".to_string(),
            download_dir: None,
            log_file: PathBuf::from("fraudwatch.log"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub url: String,
    #[serde(with = "serde_interval")]
    pub timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:5001".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Poll intervals of the live feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    #[serde(with = "serde_interval")]
    pub transactions: Duration,
    #[serde(with = "serde_interval")]
    pub stats: Duration,
    #[serde(with = "serde_interval")]
    pub alerts: Duration,
    /// Start streaming as soon as the console opens.
    pub autostart: bool,
    /// How many transactions to request per fetch.
    pub limit: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            transactions: Duration::from_secs(2),
            stats: Duration::from_secs(4),
            alerts: Duration::from_secs(5),
            autostart: true,
            limit: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// How long action results stay on screen.
    #[serde(with = "serde_interval")]
    pub ttl: Duration,
    /// How long stream pause/resume notices stay on screen.
    #[serde(with = "serde_interval")]
    pub toggle_ttl: Duration,
    pub max_visible: usize,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5),
            toggle_ttl: Duration::from_secs(3),
            max_visible: 4,
        }
    }
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend_url: Option<String>,
    pub analyst: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub transactions_interval: Option<String>,
    pub paused: bool,
}

impl DashboardConfig {
    /// Load configuration from all layers.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        Self::load_with_env(file, environment(), overrides)
    }

    fn load_with_env(
        file: Option<&Path>,
        env: Environment,
        overrides: &Overrides,
    ) -> Result<Self> {
        let mut builder: ConfigBuilder<DefaultState> = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(env);
        builder = apply_overrides(builder, overrides)?;

        let config: DashboardConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, interval) in [
            ("transactions", self.stream.transactions),
            ("stats", self.stream.stats),
            ("alerts", self.stream.alerts),
        ] {
            anyhow::ensure!(!interval.is_zero(), "stream.{} interval must be positive", name);
        }
        anyhow::ensure!(
            self.risk.review <= self.risk.block,
            "risk.review ({}) must not exceed risk.block ({})",
            self.risk.review,
            self.risk.block
        );
        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn apply_overrides(
    builder: ConfigBuilder<DefaultState>,
    overrides: &Overrides,
) -> Result<ConfigBuilder<DefaultState>> {
    let path_string = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());

    let mut builder = builder
        .set_override_option("backend.url", overrides.backend_url.clone())?
        .set_override_option("analyst", overrides.analyst.clone())?
        .set_override_option("download_dir", path_string(&overrides.download_dir))?
        .set_override_option("log_file", path_string(&overrides.log_file))?
        .set_override_option(
            "stream.transactions",
            overrides.transactions_interval.clone(),
        )?;
    if overrides.paused {
        builder = builder.set_override("stream.autostart", false)?;
    }
    Ok(builder)
}
