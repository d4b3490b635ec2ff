//! Analyzer configuration
//!
//! Composes the generation and risk settings with the scheduler's own
//! settings. Loaded from an optional TOML file layered with `ANALYZER_*`
//! environment variables (`__` separates nested keys, e.g.
//! `ANALYZER_RISK__INITIAL_BALANCE=500`).

use common::SegmentFilter;
use portfolio_risk::RiskConfig;
use serde::{Deserialize, Serialize};
use signal_generation::{PipelineConfig, ScoringConfig};
use std::path::Path;
use std::str::FromStr;
use tracing::Level;

pub const ENV_PREFIX: &str = "ANALYZER";
pub const DEFAULT_CONFIG_FILE: &str = "analyzer.toml";

/// How cycle summaries are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Log,
    Json,
}

/// Tick scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Tick period in milliseconds
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,

    /// Seconds between signal regenerations while auto-update is on
    #[serde(default = "default_signal_refresh_secs")]
    pub signal_refresh_secs: u64,

    /// Seconds between market data regenerations while auto-update is on
    #[serde(default = "default_market_refresh_secs")]
    pub market_refresh_secs: u64,

    #[serde(default = "default_auto_update")]
    pub auto_update: bool,

    /// Initial segment filter
    #[serde(default)]
    pub segment: SegmentFilter,

    /// Fixed entropy seed; unseeded runs use system entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_millis: default_tick_millis(),
            signal_refresh_secs: default_signal_refresh_secs(),
            market_refresh_secs: default_market_refresh_secs(),
            auto_update: default_auto_update(),
            segment: SegmentFilter::All,
            seed: None,
        }
    }
}

fn default_tick_millis() -> u64 {
    1000
}

fn default_signal_refresh_secs() -> u64 {
    1
}

fn default_market_refresh_secs() -> u64 {
    1
}

fn default_auto_update() -> bool {
    true
}

/// Top-level analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub output: OutputFormat,

    /// Stop after this many ticks; 0 runs until interrupted
    #[serde(default)]
    pub max_cycles: u64,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub risk: RiskConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output: OutputFormat::Log,
            max_cycles: 0,
            scheduler: SchedulerConfig::default(),
            pipeline: PipelineConfig::default(),
            scoring: ScoringConfig::default(),
            risk: RiskConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AnalyzerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.scheduler.tick_millis == 0 {
            anyhow::bail!("tick period must be positive");
        }
        self.tracing_level()?;
        self.pipeline.validate()?;
        self.scoring.validate()?;
        self.risk.validate()?;
        Ok(())
    }

    pub fn tracing_level(&self) -> anyhow::Result<Level> {
        Level::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("unknown log level: {}", self.log_level))
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn build(
    path: Option<&Path>,
    environment: config::Environment,
) -> anyhow::Result<AnalyzerConfig> {
    let file = match path {
        Some(path) => config::File::from(path),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings = config::Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()?;

    let config: AnalyzerConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from `path` (or `analyzer.toml` if present) and the
/// environment.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AnalyzerConfig> {
    build(path, environment())
}

/// Save configuration to TOML file
pub fn save_config(config: &AnalyzerConfig, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("analyzer-{}-{}.toml", name, std::process::id()))
    }

    fn isolated_env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(source))
    }

    #[test]
    fn test_defaults_validate() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tracing_level().unwrap(), Level::INFO);
        assert_eq!(config.scheduler.tick_millis, 1000);
        assert!(config.scheduler.auto_update);
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_path("file");
        std::fs::write(
            &path,
            r#"
log_level = "debug"
output = "json"
max_cycles = 5

[scheduler]
segment = "otc"
seed = 42

[pipeline]
max_signals_per_cycle = 10

[risk]
initial_balance = 500.0
"#,
        )
        .unwrap();

        let config = build(Some(&path), isolated_env(&[])).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.max_cycles, 5);
        assert_eq!(config.scheduler.segment, SegmentFilter::Otc);
        assert_eq!(config.scheduler.seed, Some(42));
        assert_eq!(config.scheduler.signal_refresh_secs, 1);
        assert_eq!(config.pipeline.max_signals_per_cycle, 10);
        assert_eq!(config.pipeline.publish_threshold, 80);
        assert_eq!(config.risk.initial_balance, dec!(500));
        assert_eq!(config.risk.payout_rate, dec!(0.8));
    }

    #[test]
    fn test_environment_overrides_file() {
        let path = temp_path("env");
        std::fs::write(&path, "max_cycles = 5\n").unwrap();

        let env = isolated_env(&[
            ("ANALYZER_MAX_CYCLES", "9"),
            ("ANALYZER_SCHEDULER__AUTO_UPDATE", "false"),
        ]);
        let config = build(Some(&path), env).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.max_cycles, 9);
        assert!(!config.scheduler.auto_update);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let path = temp_path("invalid");
        std::fs::write(&path, "log_level = \"loud\"\n").unwrap();
        assert!(build(Some(&path), isolated_env(&[])).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_path("save");
        let config = AnalyzerConfig {
            max_cycles: 3,
            ..Default::default()
        };
        save_config(&config, &path).unwrap();

        let loaded = build(Some(&path), isolated_env(&[])).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
