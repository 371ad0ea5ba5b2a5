//! Bronze stage: capture the brewery listing verbatim.

use chrono::Local;
use std::path::PathBuf;
use tracing::info;

use crate::config::LakeConfig;
use crate::error::{PipelineError, Result};

/// Fetch the brewery listing and write the response body to a dated file in
/// the bronze layer, returning the capture path.
///
/// The body is stored byte-for-byte as received; nothing is parsed here.
/// Only a literal 200 counts as success. There is no retry and no timeout;
/// filenames are date-granular, so a second run on the same date overwrites
/// that date's capture.
pub fn extract_to_bronze(config: &LakeConfig) -> Result<PathBuf> {
    info!("extracting brewery listing from {}", config.api_endpoint);

    let response = ureq::get(&config.api_endpoint)
        .call()
        .map_err(|err| match err {
            ureq::Error::StatusCode(status) => PipelineError::Extraction { status },
            other => PipelineError::Transport(other.to_string()),
        })?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(PipelineError::Extraction { status });
    }

    let body = response
        .into_body()
        .read_to_string()
        .map_err(|err| PipelineError::Transport(format!("failed reading response body: {err}")))?;

    std::fs::create_dir_all(&config.bronze_root)?;
    let run_date = Local::now().date_naive();
    let capture = config
        .bronze_root
        .join(format!("breweries_{run_date}.json"));
    std::fs::write(&capture, &body)?;

    info!("raw capture written to {}", capture.display());
    Ok(capture)
}
