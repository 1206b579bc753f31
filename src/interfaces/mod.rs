//! Abstract interfaces.
//!
//! [`ReportStore`] is the seam between the metrics layer and whatever holds
//! the data: a live database or an in-memory snapshot.

pub mod report_store;

pub use report_store::ReportStore;
