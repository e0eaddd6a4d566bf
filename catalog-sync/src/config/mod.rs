//! Run configuration loaded from TOML
//!
//! Every key has a default, so an empty file (or no file at all) is valid.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::upload::{DEFAULT_BATCH_SIZE, EntityKind};

/// Per-sheet overrides, keyed by [`EntityKind::config_key`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Sheet name to read instead of the default
    pub name: Option<String>,
    /// Drop the first data row (a human-readable column description)
    pub skip_description_row: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Writes per commit; clamped to the store's ceiling when used
    pub batch_size: usize,
    /// Overwrite product `order` values from topic and level
    pub recompute_product_order: bool,
    pub sheets: HashMap<String, SheetConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            recompute_product_order: false,
            sheets: HashMap::new(),
        }
    }
}

impl Config {
    /// Default location: `<config_dir>/catalog-sync/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("catalog-sync").join("config.toml"))
    }

    /// Load from an explicit path, or from the default path if it exists
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                Self::from_file(path)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    log::debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;

        for key in config.sheets.keys() {
            if !EntityKind::ALL.iter().any(|kind| kind.config_key() == key.as_str()) {
                bail!("Unknown sheet key [sheets.{}]", key);
            }
        }

        Ok(config)
    }

    /// Overrides for one binding (defaults when not configured)
    pub fn sheet(&self, kind: EntityKind) -> SheetConfig {
        self.sheets.get(kind.config_key()).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.batch_size, 450);
        assert!(!config.recompute_product_order);
        assert_eq!(config.sheet(EntityKind::Topic), SheetConfig::default());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            batch_size = 200
            recompute_product_order = true

            [sheets.topics]
            name = "TopicSheet"
            skip_description_row = true
            "#,
        )
        .unwrap();

        assert_eq!(config.batch_size, 200);
        assert!(config.recompute_product_order);

        let topics = config.sheet(EntityKind::Topic);
        assert_eq!(topics.name.as_deref(), Some("TopicSheet"));
        assert!(topics.skip_description_row);
        assert!(!config.sheet(EntityKind::Product).skip_description_row);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(Config::from_toml("batchsize = 3").is_err());
        assert!(Config::from_toml("[sheets.widgets]\nname = \"W\"").is_err());
        assert!(Config::from_toml("[sheets.topics]\nskip = true").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "batch_size = 10").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.batch_size, 10);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
