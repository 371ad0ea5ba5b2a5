//! # Brewlake - Brewery Data-Lake Batch Pipeline
//!
//! Brewlake fetches brewery records from the Open Brewery DB listing
//! endpoint and stages them through three storage layers:
//!
//! - **bronze**: the raw JSON response, captured verbatim, one file per
//!   run date ([`extract`])
//! - **silver**: one Parquet partition per region per run date, tracked in
//!   a manifest ([`partition`], [`manifest`])
//! - **gold**: grouped `(brewery_type, state)` counts over the latest
//!   partition of every region ([`aggregate`])
//!
//! ## Quick Start
//!
//! ```no_run
//! use brewlake::{config::LakeConfig, pipeline};
//!
//! let config = LakeConfig::default();
//! let report = pipeline::run(&config);
//! println!("{}", report.summary());
//! assert!(report.is_success());
//! ```
//!
//! ## Core Modules
//!
//! - [`config`]: layer roots and source endpoint, explicit per run
//! - [`extract`]: bronze capture (synchronous HTTP GET)
//! - [`partition`]: silver partitioning by region
//! - [`manifest`]: latest-partition bookkeeping for the silver layer
//! - [`aggregate`]: gold summary counts
//! - [`pipeline`]: stage orchestration and the typed [`pipeline::RunReport`]
//! - [`error`]: error types shared by all stages
//!
//! ## Design Notes
//!
//! The pipeline is deliberately synchronous and single-threaded: one run
//! per day, whole files read and written, no retries. Runs are
//! distinguished by date-stamped filenames; a same-day re-run overwrites
//! that day's outputs. Stages only ever read layers earlier than the one
//! they write.

#![warn(clippy::all, rust_2018_idioms)]

pub mod aggregate;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod manifest;
pub mod partition;
pub mod pipeline;
