//! Gold stage: grouped counts over the latest partition of every region.

use chrono::Local;
use polars::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::LakeConfig;
use crate::error::Result;
use crate::manifest::SilverManifest;
use crate::partition::REGION_COLUMN;

/// Record field holding the brewery category.
pub const TYPE_COLUMN: &str = "brewery_type";

/// Output column holding the group size.
pub const COUNT_COLUMN: &str = "count";

/// Combine the latest partition per region and write grouped
/// `(brewery_type, state)` counts to a dated file in the gold layer.
///
/// Which file is "latest" comes from the silver manifest, never from
/// directory listings. `Ok(None)` means there was nothing to aggregate:
/// a legitimate terminal state on a first-ever run, not an error. Manifest
/// entries whose file has vanished are skipped with a warning.
pub fn aggregate_to_gold(config: &LakeConfig) -> Result<Option<PathBuf>> {
    let manifest = SilverManifest::load(&config.silver_root)?;
    if manifest.is_empty() {
        info!("no silver partitions recorded; nothing to aggregate");
        return Ok(None);
    }

    let mut combined: Option<DataFrame> = None;
    for (region, entry) in manifest.iter() {
        let path = config.silver_root.join(&entry.file);
        if !path.exists() {
            warn!(
                "partition for region {region} missing on disk: {}",
                path.display()
            );
            continue;
        }
        let df = ParquetReader::new(std::fs::File::open(&path)?).finish()?;
        combined = Some(match combined {
            Some(acc) => acc.vstack(&df)?,
            None => df,
        });
    }

    let Some(combined) = combined else {
        info!("no partition files readable; nothing to aggregate");
        return Ok(None);
    };

    let mut summary = combined
        .lazy()
        .group_by([col(TYPE_COLUMN), col(REGION_COLUMN)])
        .agg([len().alias(COUNT_COLUMN)])
        .sort([TYPE_COLUMN, REGION_COLUMN], Default::default())
        .collect()?;

    std::fs::create_dir_all(&config.gold_root)?;
    let run_date = Local::now().date_naive();
    let path = config
        .gold_root
        .join(format!("brewery_aggregation_{run_date}.parquet"));
    ParquetWriter::new(std::fs::File::create(&path)?).finish(&mut summary)?;

    info!("aggregate written to {}", path.display());
    Ok(Some(path))
}
