//! Report parameters.

use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;

use crate::reports::{DEFAULT_CHURN_WINDOW_DAYS, DEFAULT_TOP_N};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Days without a rental before a customer counts as inactive.
    pub churn_window_days: i64,
    /// Cap for the top customers and most-rented films reports.
    pub top_n: usize,
    /// Evaluation instant for the churn report, e.g. `2006-02-14T15:16:03`.
    /// Unset means now.
    pub as_of: Option<NaiveDateTime>,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            churn_window_days: DEFAULT_CHURN_WINDOW_DAYS,
            top_n: DEFAULT_TOP_N,
            as_of: None,
        }
    }
}

impl ReportsConfig {
    /// The configured `as_of`, or the current UTC wall clock.
    pub fn evaluation_time(&self) -> NaiveDateTime {
        self.as_of.unwrap_or_else(|| Utc::now().naive_utc())
    }
}
