//! Signal generation configuration

use crate::pipeline::PipelineConfig;
use crate::scoring::ScoringConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Combined pipeline and scoring configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl GenerationConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.pipeline.validate()?;
        self.scoring.validate()?;
        Ok(())
    }
}

/// Load configuration from TOML file
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<GenerationConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: GenerationConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to TOML file
pub fn save_config(config: &GenerationConfig, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
