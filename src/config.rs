//! Lake configuration: where each storage layer lives and which endpoint
//! feeds the bronze layer.
//!
//! Paths are explicit rather than module-level constants so that every
//! stage can be pointed at a throwaway directory in tests.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Brewery listing endpoint queried by the extract stage.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.openbrewerydb.org/breweries";

/// Root directory of the lake when none is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Layer roots and source endpoint for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LakeConfig {
    /// HTTP endpoint returning a JSON array of brewery records
    pub api_endpoint: String,
    /// Raw capture layer (verbatim JSON, one file per run date)
    pub bronze_root: PathBuf,
    /// Partitioned layer (one Parquet file per region per run date)
    pub silver_root: PathBuf,
    /// Aggregated layer (one summary Parquet per run date)
    pub gold_root: PathBuf,
}

impl Default for LakeConfig {
    fn default() -> Self {
        Self::with_root(DEFAULT_DATA_DIR)
    }
}

impl LakeConfig {
    /// Derive all three layer roots under a single data directory.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_owned(),
            bronze_root: root.join("bronze"),
            silver_root: root.join("silver"),
            gold_root: root.join("gold"),
        }
    }

    /// Create the layer directories if they do not exist yet.
    pub fn ensure_layout(&self) -> Result<()> {
        for root in [&self.bronze_root, &self.silver_root, &self.gold_root] {
            std::fs::create_dir_all(root)
                .with_context(|| format!("Failed to create layer directory: {}", root.display()))?;
        }
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_layout() {
        let config = LakeConfig::default();
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert_eq!(config.bronze_root, PathBuf::from("data/bronze"));
        assert_eq!(config.silver_root, PathBuf::from("data/silver"));
        assert_eq!(config.gold_root, PathBuf::from("data/gold"));
    }

    #[test]
    fn test_ensure_layout_creates_directories() -> Result<()> {
        let temp = TempDir::new()?;
        let config = LakeConfig::with_root(temp.path());
        config.ensure_layout()?;

        assert!(config.bronze_root.is_dir());
        assert!(config.silver_root.is_dir());
        assert!(config.gold_root.is_dir());
        Ok(())
    }

    #[test]
    fn test_config_round_trip() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("lake.json");

        let mut config = LakeConfig::with_root(temp.path().join("lake"));
        config.api_endpoint = "http://127.0.0.1:9/breweries".to_owned();
        config.save(&path)?;

        let loaded = LakeConfig::load(&path)?;
        assert_eq!(loaded.api_endpoint, config.api_endpoint);
        assert_eq!(loaded.silver_root, config.silver_root);
        Ok(())
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write");

        assert!(LakeConfig::load(&path).is_err());
    }
}
