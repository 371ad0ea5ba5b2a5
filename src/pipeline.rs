//! Orchestration of the three lake stages.
//!
//! Stages run in strict sequence; the first failure stops the run and is
//! captured in the [`RunReport`] with the stage that produced it. Nothing
//! written by earlier stages is rolled back: a bronze capture left behind
//! by a failed partition run stays on disk.

use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info};

use crate::aggregate::aggregate_to_gold;
use crate::config::LakeConfig;
use crate::error::PipelineError;
use crate::extract::extract_to_bronze;
use crate::partition::partition_to_silver;

/// Pipeline stage, for failure attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Partition,
    Aggregate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extract => write!(f, "extract"),
            Self::Partition => write!(f, "partition"),
            Self::Aggregate => write!(f, "aggregate"),
        }
    }
}

/// A stage failure with its origin.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: PipelineError,
}

/// Outcome of one pipeline run.
///
/// Layer paths are filled in as stages complete; `failure` carries the
/// first (and only) stage error, if any. A successful run with
/// `gold_file: None` means there was nothing to aggregate.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Raw capture written by the extract stage
    pub bronze_file: Option<PathBuf>,

    /// Silver root returned by the partition stage
    pub silver_root: Option<PathBuf>,

    /// Summary file written by the aggregate stage, if any data existed
    pub gold_file: Option<PathBuf>,

    /// First stage failure, if the run did not complete
    pub failure: Option<StageFailure>,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Process exit code for this run: 0 on success, 1 on any stage failure.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }

    /// One-line human-readable outcome.
    pub fn summary(&self) -> String {
        let secs = self.duration.as_secs_f64();
        match &self.failure {
            Some(failure) => format!(
                "Pipeline failed during {} stage: {} ({secs:.2}s)",
                failure.stage, failure.error
            ),
            None => match &self.gold_file {
                Some(path) => {
                    format!("Pipeline completed: aggregate written to {} ({secs:.2}s)", path.display())
                }
                None => format!("Pipeline completed: no data available to aggregate ({secs:.2}s)"),
            },
        }
    }
}

/// Run extract, partition and aggregate in order.
///
/// Never panics and never returns an error: any stage failure is logged
/// and recorded in the report, and the caller decides what to do with it
/// (the binary maps it to the process exit code).
pub fn run(config: &LakeConfig) -> RunReport {
    let started = Instant::now();
    let mut report = RunReport::default();

    info!("starting pipeline run");
    if let Err(failure) = execute(config, &mut report) {
        error!("{} stage failed: {}", failure.stage, failure.error);
        report.failure = Some(failure);
    }
    report.duration = started.elapsed();

    if report.is_success() {
        info!("pipeline run finished in {:.2}s", report.duration.as_secs_f64());
    }
    report
}

fn execute(config: &LakeConfig, report: &mut RunReport) -> Result<(), StageFailure> {
    let fail = |stage: Stage| move |error: PipelineError| StageFailure { stage, error };

    config
        .ensure_layout()
        .map_err(PipelineError::from)
        .map_err(fail(Stage::Extract))?;

    let bronze_file = extract_to_bronze(config).map_err(fail(Stage::Extract))?;
    report.bronze_file = Some(bronze_file.clone());

    let silver_root = partition_to_silver(config, &bronze_file).map_err(fail(Stage::Partition))?;
    report.silver_root = Some(silver_root);

    report.gold_file = aggregate_to_gold(config).map_err(fail(Stage::Aggregate))?;
    Ok(())
}
