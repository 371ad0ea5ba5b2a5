//! Silver-layer manifest: which partition file is current for each region.
//!
//! Recency is carried as data instead of being inferred from filename sort
//! order. The partition stage records every file it writes here; the
//! aggregate stage reads only files the manifest points at.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Manifest filename at the silver root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// The most recent partition written for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionEntry {
    /// Run date the partition was produced on
    pub run_date: NaiveDate,
    /// Partition file path, relative to the silver root
    pub file: PathBuf,
    /// Number of records in the partition
    pub rows: usize,
}

/// Region → latest partition mapping, persisted as JSON at the silver root.
///
/// A `BTreeMap` keeps both the serialized form and aggregation order
/// deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SilverManifest {
    partitions: BTreeMap<String, PartitionEntry>,
}

impl SilverManifest {
    /// Load the manifest from a silver root. A missing file is an empty
    /// manifest, not an error.
    pub fn load(silver_root: &Path) -> Result<Self> {
        let path = silver_root.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|err| {
            PipelineError::Manifest(format!("failed to parse {}: {err}", path.display()))
        })
    }

    /// Persist the manifest at the silver root.
    pub fn save(&self, silver_root: &Path) -> Result<()> {
        std::fs::create_dir_all(silver_root)?;
        let path = silver_root.join(MANIFEST_FILE);
        let content = serde_json::to_string_pretty(self).map_err(|err| {
            PipelineError::Manifest(format!("failed to serialize manifest: {err}"))
        })?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Record a partition for a region.
    ///
    /// Updates are monotonic on run date: an entry is only replaced when the
    /// new partition's run date is equal or later. A same-date re-run
    /// therefore replaces that date's entry (overwrite semantics).
    pub fn record(&mut self, region: impl Into<String>, entry: PartitionEntry) {
        let region = region.into();
        match self.partitions.get(&region) {
            Some(existing) if existing.run_date > entry.run_date => {}
            _ => {
                self.partitions.insert(region, entry);
            }
        }
    }

    pub fn get(&self, region: &str) -> Option<&PartitionEntry> {
        self.partitions.get(region)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PartitionEntry)> {
        self.partitions.iter()
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}
