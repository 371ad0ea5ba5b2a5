//! Silver stage: split one raw capture into per-region Parquet partitions.

use chrono::Local;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::LakeConfig;
use crate::error::{PipelineError, Result};
use crate::manifest::{PartitionEntry, SilverManifest};

/// Record field used as the partition key.
pub const REGION_COLUMN: &str = "state";

/// Partition a raw capture by region and return the silver root.
///
/// One Parquet file per region per run date; a same-date re-run overwrites
/// that date's files. Records whose region is null, missing or empty are
/// dropped entirely, with no "unknown region" bucket. Each written
/// partition is recorded in the silver manifest.
pub fn partition_to_silver(config: &LakeConfig, raw_capture: &Path) -> Result<PathBuf> {
    info!("partitioning {} by region", raw_capture.display());

    let raw = std::fs::read_to_string(raw_capture)?;
    let record_count = validate_capture(&raw)?;

    let mut manifest = SilverManifest::load(&config.silver_root)?;

    if record_count == 0 {
        warn!("capture holds no records; nothing partitioned");
        manifest.save(&config.silver_root)?;
        return Ok(config.silver_root.clone());
    }

    let df = JsonReader::new(Cursor::new(raw.into_bytes())).finish()?;
    let regions = region_keys(&df)?;
    if regions.is_empty() {
        warn!("no records with a usable region; nothing partitioned");
        manifest.save(&config.silver_root)?;
        return Ok(config.silver_root.clone());
    }

    let run_date = Local::now().date_naive();
    let file_name = format!("breweries_{run_date}.parquet");

    for region in regions {
        let mut group = df
            .clone()
            .lazy()
            .filter(col(REGION_COLUMN).eq(lit(region.as_str())))
            .collect()?;

        let region_dir = config.silver_root.join(&region);
        std::fs::create_dir_all(&region_dir)?;
        let path = region_dir.join(&file_name);
        let file = std::fs::File::create(&path)?;
        ParquetWriter::new(file).finish(&mut group)?;

        info!("{} records written to {}", group.height(), path.display());
        manifest.record(
            region.clone(),
            PartitionEntry {
                run_date,
                file: PathBuf::from(&region).join(&file_name),
                rows: group.height(),
            },
        );
    }

    manifest.save(&config.silver_root)?;
    Ok(config.silver_root.clone())
}

/// The capture must be a JSON array of record mappings. Returns the record
/// count.
fn validate_capture(raw: &str) -> Result<usize> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|err| PipelineError::MalformedCapture(format!("not valid JSON: {err}")))?;

    let Some(records) = value.as_array() else {
        return Err(PipelineError::MalformedCapture(
            "expected a JSON array of records".to_owned(),
        ));
    };
    if let Some(pos) = records.iter().position(|record| !record.is_object()) {
        return Err(PipelineError::MalformedCapture(format!(
            "record {pos} is not a mapping"
        )));
    }
    Ok(records.len())
}

/// Distinct non-null, non-empty region values in the capture.
fn region_keys(df: &DataFrame) -> Result<Vec<String>> {
    let Ok(column) = df.column(REGION_COLUMN) else {
        // every record lacks the region field
        return Ok(Vec::new());
    };
    let series = column.as_materialized_series();
    if series.dtype() != &DataType::String {
        // region present but never a string value (e.g. all null)
        return Ok(Vec::new());
    }

    let unique = series.unique()?.drop_nulls();
    let regions = unique
        .str()?
        .into_iter()
        .flatten()
        .filter(|region| !region.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE_CAPTURE: &str = r#"[
        {"id": "brewery-1", "name": "Test Brewery 1", "brewery_type": "micro", "city": "Test City", "state": "Test State"},
        {"id": "brewery-2", "name": "Test Brewery 2", "brewery_type": "brewpub", "city": "Another City", "state": "Another State"}
    ]"#;

    fn write_capture(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("breweries_test.json");
        std::fs::write(&path, content).expect("write capture");
        path
    }

    fn parquet_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .expect("read dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("parquet"))
            .collect()
    }

    fn read_parquet(path: &Path) -> DataFrame {
        ParquetReader::new(std::fs::File::open(path).expect("open parquet"))
            .finish()
            .expect("read parquet")
    }

    #[test]
    fn test_partitions_by_region() -> Result<()> {
        let temp = TempDir::new().expect("temp dir");
        let config = LakeConfig::with_root(temp.path());
        let capture = write_capture(temp.path(), SAMPLE_CAPTURE);

        let silver = partition_to_silver(&config, &capture)?;
        assert_eq!(silver, config.silver_root);

        for (region, expected_name) in [
            ("Test State", "Test Brewery 1"),
            ("Another State", "Test Brewery 2"),
        ] {
            let files = parquet_files(&config.silver_root.join(region));
            assert_eq!(files.len(), 1, "one partition file for {region}");

            let df = read_parquet(&files[0]);
            assert_eq!(df.height(), 1);
            let names = df.column("name")?.as_materialized_series().clone();
            assert_eq!(names.str()?.get(0), Some(expected_name));
        }

        let manifest = SilverManifest::load(&config.silver_root)?;
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.get("Test State").map(|e| e.rows), Some(1));
        Ok(())
    }

    #[test]
    fn test_null_missing_and_empty_regions_are_dropped() -> Result<()> {
        let temp = TempDir::new().expect("temp dir");
        let config = LakeConfig::with_root(temp.path());
        let capture = write_capture(
            temp.path(),
            r#"[
                {"id": "b-1", "name": "Kept 1", "brewery_type": "micro", "city": "C", "state": "Test State"},
                {"id": "b-2", "name": "Kept 2", "brewery_type": "brewpub", "city": "C", "state": "Another State"},
                {"id": "b-3", "name": "Null region", "brewery_type": "micro", "city": "C", "state": null},
                {"id": "b-4", "name": "No region", "brewery_type": "micro", "city": "C"},
                {"id": "b-5", "name": "Empty region", "brewery_type": "micro", "city": "C", "state": ""}
            ]"#,
        );

        partition_to_silver(&config, &capture)?;

        let region_dirs: Vec<_> = std::fs::read_dir(&config.silver_root)
            .expect("read silver root")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .collect();
        assert_eq!(region_dirs.len(), 2, "exactly the two named regions");

        let mut total_rows = 0;
        for dir in &region_dirs {
            for file in parquet_files(&dir.path()) {
                total_rows += read_parquet(&file).height();
            }
        }
        assert_eq!(total_rows, 2, "dropped records must not appear anywhere");
        Ok(())
    }

    #[test]
    fn test_same_date_rerun_overwrites() -> Result<()> {
        let temp = TempDir::new().expect("temp dir");
        let config = LakeConfig::with_root(temp.path());
        let capture = write_capture(temp.path(), SAMPLE_CAPTURE);

        partition_to_silver(&config, &capture)?;
        partition_to_silver(&config, &capture)?;

        let files = parquet_files(&config.silver_root.join("Test State"));
        assert_eq!(files.len(), 1, "same-date re-run overwrites, not appends");
        assert_eq!(read_parquet(&files[0]).height(), 1);

        let manifest = SilverManifest::load(&config.silver_root)?;
        assert_eq!(manifest.len(), 2);
        Ok(())
    }

    #[test]
    fn test_rejects_malformed_captures() {
        let temp = TempDir::new().expect("temp dir");
        let config = LakeConfig::with_root(temp.path());

        for content in ["definitely not json", r#"{"id": "b-1"}"#, "[1, 2, 3]"] {
            let capture = write_capture(temp.path(), content);
            let err = partition_to_silver(&config, &capture).unwrap_err();
            assert!(
                matches!(err, PipelineError::MalformedCapture(_)),
                "expected MalformedCapture for {content:?}, got {err}"
            );
        }
    }

    #[test]
    fn test_capture_without_usable_regions() -> Result<()> {
        let temp = TempDir::new().expect("temp dir");
        let config = LakeConfig::with_root(temp.path());
        let capture = write_capture(
            temp.path(),
            r#"[{"id": "b-1", "name": "Nowhere", "brewery_type": "micro", "city": "C"}]"#,
        );

        let silver = partition_to_silver(&config, &capture)?;

        let region_dirs = std::fs::read_dir(&silver)
            .expect("read silver root")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .count();
        assert_eq!(region_dirs, 0);
        assert!(SilverManifest::load(&silver)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_capture_is_a_no_op() -> Result<()> {
        let temp = TempDir::new().expect("temp dir");
        let config = LakeConfig::with_root(temp.path());
        let capture = write_capture(temp.path(), "[]");

        partition_to_silver(&config, &capture)?;
        assert!(SilverManifest::load(&config.silver_root)?.is_empty());
        Ok(())
    }
}
