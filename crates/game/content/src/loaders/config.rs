//! Game configuration loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use skirmish_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Configuration in data form; omitted keys keep the core defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigSpec {
    pub back_attack_bonus: Option<i32>,
    pub darkness_penalty: Option<i32>,
    pub attribute_test_target: Option<i32>,
    pub fumble_threshold: Option<u8>,
}

impl ConfigSpec {
    pub fn build(&self) -> GameConfig {
        let defaults = GameConfig::default();
        GameConfig {
            back_attack_bonus: self.back_attack_bonus.unwrap_or(defaults.back_attack_bonus),
            darkness_penalty: self.darkness_penalty.unwrap_or(defaults.darkness_penalty),
            attribute_test_target: self
                .attribute_test_target
                .unwrap_or(defaults.attribute_test_target),
            fumble_threshold: self.fumble_threshold.unwrap_or(defaults.fumble_threshold),
        }
    }
}

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let spec: ConfigSpec = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Ok(spec.build())
    }
}
