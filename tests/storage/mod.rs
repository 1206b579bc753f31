//! Shared storage integration tests.
//!
//! Tests the ReportStore interface against all implementations. Each
//! implementation module seeds its store with `common::sample_dataset`,
//! imports these test functions and runs them.

pub mod report_store_tests;
