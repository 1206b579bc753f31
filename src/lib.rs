//! dvd-analytics: reporting over a DVD rental store dataset.
//!
//! Base relations are normalized into two views (`payment_analysis`,
//! `rental_clean`) and a set of independent reports is computed over them.
//! Reports run either in memory over a [`model::Dataset`] or in SQL against
//! SQLite or PostgreSQL; both produce the same results.

pub mod config;
pub mod error;
pub mod interfaces;
pub mod model;
pub mod pipeline;
pub mod reports;
pub mod storage;
pub mod utils;
pub mod views;

pub use error::{ReportError, Result};
pub use interfaces::ReportStore;
pub use model::Dataset;
pub use pipeline::{ReportOptions, ReportPipeline, ReportSet};
