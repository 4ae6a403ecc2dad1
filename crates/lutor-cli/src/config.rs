//! Optional YAML defaults for the CLI.
//!
//! ```yaml
//! lut:
//!   size: 33
//!   max_samples: 20000
//!   neighbors: 5
//!   seed: 42
//! title: "Warm Film"
//! transfer:
//!   strength: 0.8
//! ```
//!
//! Every key is optional. Explicit command-line flags win over the file.

use anyhow::{Context, Result};
use lutor_color::TransferOptions;
use lutor_lut::LutBuilderOptions;
use serde::Deserialize;
use std::path::Path;

/// Settings shared by all commands.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// LUT builder defaults.
    pub lut: LutBuilderOptions,
    /// `.cube` title override.
    pub title: Option<String>,
    /// Color transfer defaults.
    pub transfer: TransferOptions,
}

impl Config {
    /// Loads config from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Parses config from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg = Config::from_yaml_str("lut:\n  size: 17\n  seed: 3\ntransfer:\n  strength: 0.5\n").unwrap();
        assert_eq!(cfg.lut.size, 17);
        assert_eq!(cfg.lut.seed, Some(3));
        assert_eq!(cfg.lut.neighbors, lutor_lut::DEFAULT_NEIGHBORS);
        assert_eq!(cfg.transfer.strength, 0.5);
        assert!(cfg.transfer.auto_resize);
        assert_eq!(cfg.title, None);
    }

    #[test]
    fn empty_and_unknown() {
        assert_eq!(Config::from_yaml_str("").unwrap(), Config::default());
        assert!(Config::from_yaml_str("lut_size: 3\n").is_err());
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lutor.yaml");
        std::fs::write(&path, "title: Teal\n").unwrap();
        assert_eq!(Config::from_file(&path).unwrap().title.as_deref(), Some("Teal"));
        assert!(Config::from_file(dir.path().join("missing.yaml")).is_err());
    }
}
