//! Engine configuration loaded from TOML.
//!
//! ```toml
//! check_validity = true
//! start_type = "Grassland"
//!
//! [rules]
//! preset = "extended"            # or "default"
//! pairs = [["Town", "Field"]]    # added to the preset
//! exclusive = ["River", "Railway"]
//! ```

use hexmap_core::{EngineConfig, MatchRules, TileType};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Unknown rules preset '{0}'")]
    UnknownPreset(String),
}

/// Rule table section. All fields optional.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RulesFile {
    pub preset: Option<String>,
    /// Extra pairs on top of the preset
    #[serde(default)]
    pub pairs: Vec<(TileType, TileType)>,
    /// Replaces the preset's exclusive types when present
    pub exclusive: Option<Vec<TileType>>,
}

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigFile {
    pub check_validity: Option<bool>,
    pub start_type: Option<TileType>,
    #[serde(default)]
    pub rules: RulesFile,
}

impl ConfigFile {
    /// Convert to an engine config, using defaults for any unspecified fields.
    pub fn to_engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let d = EngineConfig::default();
        let mut rules = match self.rules.preset.as_deref() {
            None | Some("default") => MatchRules::default(),
            Some("extended") => MatchRules::extended(),
            Some(other) => return Err(ConfigError::UnknownPreset(other.to_string())),
        };
        rules.pairs.extend(self.rules.pairs.iter().copied());
        if let Some(exclusive) = &self.rules.exclusive {
            rules.exclusive = exclusive.clone();
        }
        Ok(EngineConfig {
            rules,
            check_validity: self.check_validity.unwrap_or(d.check_validity),
            start_type: self.start_type.unwrap_or(d.start_type),
        })
    }
}

/// Load a config file from the given path.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let file: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    file.to_engine_config()
}

/// Load the config from `explicit`, else from well-known paths, else defaults.
///
/// An explicit path that fails to load is an error; a well-known path that
/// fails is logged and skipped.
pub fn resolve_config(explicit: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    if let Some(path) = explicit {
        let config = load_config(path)?;
        tracing::info!(path = %path.display(), "loaded engine config");
        return Ok(config);
    }

    let candidates = ["hexmap.toml", ".hexmap.toml"];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_config(p) {
                Ok(config) => {
                    tracing::info!(path = %p.display(), "loaded engine config");
                    return Ok(config);
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load engine config");
                }
            }
        }
    }
    tracing::info!("no hexmap.toml found, using built-in defaults");
    Ok(EngineConfig::default())
}
