//! Report pipeline.
//!
//! Installs the views, then evaluates every report against the same store.
//! Reports are independent, so they run concurrently; the first failure
//! fails the run and no partial set is returned.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{OutputFormat, ReportsConfig};
use crate::error::Result;
use crate::interfaces::ReportStore;
use crate::reports::{
    churn_cutoff, CategoryRevenue, CustomerLifetimeValue, DuplicateRental, FilmRentalCount,
    InactiveCustomer, MissingValueAudit, MonthlyRevenue, RentalDurationAudit, StorePerformance,
    TableRowCount, DEFAULT_CHURN_WINDOW_DAYS, DEFAULT_TOP_N,
};

/// Parameters of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Evaluation instant for the churn report.
    pub as_of: NaiveDateTime,
    pub churn_window_days: i64,
    pub top_n: usize,
}

impl ReportOptions {
    pub fn new(as_of: NaiveDateTime) -> Self {
        Self {
            as_of,
            churn_window_days: DEFAULT_CHURN_WINDOW_DAYS,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn from_config(config: &ReportsConfig) -> Self {
        Self {
            as_of: config.evaluation_time(),
            churn_window_days: config.churn_window_days,
            top_n: config.top_n,
        }
    }

    /// Last-rental instant a customer must reach to count as active.
    pub fn churn_cutoff(&self) -> NaiveDateTime {
        churn_cutoff(self.as_of, self.churn_window_days)
    }
}

/// Every report of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSet {
    pub as_of: NaiveDateTime,
    pub churn_cutoff: NaiveDateTime,
    pub row_counts: Vec<TableRowCount>,
    pub missing_values: MissingValueAudit,
    pub duplicate_rentals: Vec<DuplicateRental>,
    pub revenue_by_category: Vec<CategoryRevenue>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub store_performance: Vec<StorePerformance>,
    pub top_customers: Vec<CustomerLifetimeValue>,
    pub most_rented_films: Vec<FilmRentalCount>,
    pub inactive_customers: Vec<InactiveCustomer>,
    pub rental_durations: RentalDurationAudit,
}

/// Totals of the revenue reports, which must agree with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueTotals {
    pub by_category: Decimal,
    pub by_month: Decimal,
    pub by_store: Decimal,
}

impl RevenueTotals {
    pub fn is_conserved(&self) -> bool {
        self.by_category == self.by_month && self.by_month == self.by_store
    }
}

impl ReportSet {
    /// Sum each revenue breakdown.
    ///
    /// Every breakdown partitions the same payment analysis rows, so the
    /// totals agree up to per-group rounding. With amounts at cent
    /// precision they agree exactly.
    pub fn revenue_totals(&self) -> RevenueTotals {
        RevenueTotals {
            by_category: self.revenue_by_category.iter().map(|r| r.revenue).sum(),
            by_month: self.monthly_revenue.iter().map(|r| r.revenue).sum(),
            by_store: self.store_performance.iter().map(|r| r.revenue).sum(),
        }
    }

    /// True when the category, monthly and store totals agree to the cent.
    pub fn verify_revenue_conservation(&self) -> bool {
        let totals = self.revenue_totals();
        if !totals.is_conserved() {
            warn!(
                by_category = %totals.by_category,
                by_month = %totals.by_month,
                by_store = %totals.by_store,
                "Revenue totals disagree"
            );
            return false;
        }
        true
    }

    /// Render the set in the configured output format.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(self)?,
            OutputFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }

    /// Row counts keyed by relation name.
    pub fn row_count_map(&self) -> BTreeMap<&str, i64> {
        self.row_counts
            .iter()
            .map(|c| (c.table.as_str(), c.row_count))
            .collect()
    }
}

/// Evaluates the full report set against one store.
pub struct ReportPipeline<S: ReportStore + ?Sized = dyn ReportStore> {
    store: Arc<S>,
    options: ReportOptions,
}

impl<S: ReportStore + ?Sized> ReportPipeline<S> {
    pub fn new(store: Arc<S>, options: ReportOptions) -> Self {
        Self { store, options }
    }

    /// Install the views and evaluate every report.
    pub async fn run(&self) -> Result<ReportSet> {
        let store = self.store.as_ref();
        let cutoff = self.options.churn_cutoff();

        info!(
            as_of = %self.options.as_of,
            churn_cutoff = %cutoff,
            top_n = self.options.top_n,
            "Running report pipeline"
        );

        store.install_views().await?;

        let (
            row_counts,
            missing_values,
            duplicate_rentals,
            revenue_by_category,
            monthly_revenue,
            store_performance,
            top_customers,
            most_rented_films,
            inactive_customers,
            rental_durations,
        ) = tokio::try_join!(
            store.row_counts(),
            store.missing_values(),
            store.duplicate_rentals(),
            store.revenue_by_category(),
            store.monthly_revenue(),
            store.store_performance(),
            store.top_customers(self.options.top_n),
            store.most_rented_films(self.options.top_n),
            store.inactive_customers(cutoff),
            store.rental_durations(),
        )?;

        if !duplicate_rentals.is_empty() {
            warn!(count = duplicate_rentals.len(), "Duplicate rental ids found");
        }
        if rental_durations.negative_durations > 0 {
            warn!(
                count = rental_durations.negative_durations,
                "Rentals returned before they were rented"
            );
        }

        info!(
            categories = revenue_by_category.len(),
            months = monthly_revenue.len(),
            stores = store_performance.len(),
            inactive_customers = inactive_customers.len(),
            "Report pipeline complete"
        );

        Ok(ReportSet {
            as_of: self.options.as_of,
            churn_cutoff: cutoff,
            row_counts,
            missing_values,
            duplicate_rentals,
            revenue_by_category,
            monthly_revenue,
            store_performance,
            top_customers,
            most_rented_films,
            inactive_customers,
            rental_durations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        parse_timestamp, Category, Customer, Dataset, Film, FilmCategory, InventoryItem, Payment,
        Rental,
    };
    use crate::storage::MemoryReportStore;

    fn ts(value: &str) -> NaiveDateTime {
        parse_timestamp(value).expect("valid timestamp")
    }

    fn two_store_dataset() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.categories = vec![
            Category {
                category_id: 1,
                name: "Action".into(),
            },
            Category {
                category_id: 2,
                name: "Comedy".into(),
            },
        ];
        dataset.films = vec![
            Film {
                film_id: 10,
                title: "ACADEMY DINOSAUR".into(),
                rental_duration: 6,
                rental_rate: Decimal::new(99, 2),
            },
            Film {
                film_id: 20,
                title: "AFRICAN EGG".into(),
                rental_duration: 6,
                rental_rate: Decimal::new(299, 2),
            },
        ];
        dataset.film_categories = vec![
            FilmCategory {
                film_id: 10,
                category_id: 1,
            },
            FilmCategory {
                film_id: 20,
                category_id: 2,
            },
        ];
        dataset.inventory = vec![
            InventoryItem {
                inventory_id: 100,
                film_id: 10,
                store_id: 1,
            },
            InventoryItem {
                inventory_id: 200,
                film_id: 20,
                store_id: 2,
            },
        ];
        dataset.customers = vec![
            Customer {
                customer_id: 1,
                first_name: "Mary".into(),
                last_name: "Smith".into(),
                store_id: 1,
            },
            Customer {
                customer_id: 2,
                first_name: "Linda".into(),
                last_name: "Williams".into(),
                store_id: 2,
            },
        ];
        dataset.rentals = vec![
            Rental {
                rental_id: 1000,
                customer_id: 1,
                inventory_id: 100,
                rental_date: Some(ts("2005-05-24 22:53:30")),
                return_date: Some(ts("2005-05-26 22:04:30")),
            },
            Rental {
                rental_id: 1001,
                customer_id: 2,
                inventory_id: 200,
                rental_date: Some(ts("2005-07-01 10:00:00")),
                return_date: None,
            },
        ];
        dataset.payments = vec![
            Payment {
                payment_id: 1,
                customer_id: 1,
                rental_id: 1000,
                amount: Some(Decimal::new(499, 2)),
                payment_date: ts("2005-05-25 11:30:37"),
            },
            Payment {
                payment_id: 2,
                customer_id: 2,
                rental_id: 1001,
                amount: Some(Decimal::new(299, 2)),
                payment_date: ts("2005-07-01 10:05:00"),
            },
        ];
        dataset
    }

    #[tokio::test]
    async fn test_run_produces_every_report() {
        let store = Arc::new(MemoryReportStore::new(two_store_dataset()));
        let options = ReportOptions::new(ts("2005-09-01 00:00:00"));
        let pipeline = ReportPipeline::new(store, options);

        let set = pipeline.run().await.expect("pipeline should run");

        assert_eq!(set.row_counts.len(), 7);
        assert_eq!(set.row_count_map()["payment"], 2);
        assert!(set.duplicate_rentals.is_empty());
        assert_eq!(set.revenue_by_category.len(), 2);
        assert_eq!(set.revenue_by_category[0].category, "Action");
        assert_eq!(set.monthly_revenue.len(), 2);
        assert_eq!(set.store_performance.len(), 2);
        assert_eq!(set.top_customers[0].customer_id, 1);
        assert_eq!(set.most_rented_films.len(), 2);
        assert_eq!(set.rental_durations.outstanding_rentals, 1);
        assert!(set.verify_revenue_conservation());
    }

    #[tokio::test]
    async fn test_run_churn_uses_configured_window() {
        let store = Arc::new(MemoryReportStore::new(two_store_dataset()));
        // 2005-09-01 minus 90 days is 2005-06-03: only Mary's May rental is older
        let options = ReportOptions::new(ts("2005-09-01 00:00:00"));
        let set = ReportPipeline::new(store.clone(), options)
            .run()
            .await
            .expect("pipeline should run");
        assert_eq!(set.churn_cutoff, ts("2005-06-03 00:00:00"));
        let ids: Vec<i64> = set.inactive_customers.iter().map(|c| c.customer_id).collect();
        assert_eq!(ids, vec![1]);

        let options = ReportOptions {
            churn_window_days: 30,
            ..ReportOptions::new(ts("2005-09-01 00:00:00"))
        };
        let set = ReportPipeline::new(store, options)
            .run()
            .await
            .expect("pipeline should run");
        let ids: Vec<i64> = set.inactive_customers.iter().map(|c| c.customer_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_run_respects_top_n() {
        let store = Arc::new(MemoryReportStore::new(two_store_dataset()));
        let options = ReportOptions {
            top_n: 1,
            ..ReportOptions::new(ts("2005-09-01 00:00:00"))
        };

        let set = ReportPipeline::new(store, options)
            .run()
            .await
            .expect("pipeline should run");

        assert_eq!(set.top_customers.len(), 1);
        assert_eq!(set.most_rented_films.len(), 1);
    }

    #[tokio::test]
    async fn test_run_fails_without_partial_results() {
        let store = Arc::new(MemoryReportStore::new(two_store_dataset()));
        store.set_unavailable(true).await;
        let pipeline = ReportPipeline::new(store, ReportOptions::new(ts("2005-09-01 00:00:00")));

        let result = pipeline.run().await;

        assert!(matches!(
            result,
            Err(crate::error::ReportError::Database(sqlx::Error::PoolClosed))
        ));
    }

    #[tokio::test]
    async fn test_run_on_empty_dataset() {
        let store = Arc::new(MemoryReportStore::new(Dataset::new()));
        let set = ReportPipeline::new(store, ReportOptions::new(ts("2006-02-14 15:16:03")))
            .run()
            .await
            .expect("pipeline should run");

        assert!(set.row_counts.iter().all(|c| c.row_count == 0));
        assert!(set.revenue_by_category.is_empty());
        assert!(set.top_customers.is_empty());
        assert!(set.inactive_customers.is_empty());
        assert_eq!(set.rental_durations.average_rental_hours, None);
        assert!(set.verify_revenue_conservation());
    }

    #[tokio::test]
    async fn test_render_formats() {
        let store = Arc::new(MemoryReportStore::new(two_store_dataset()));
        let set = ReportPipeline::new(store, ReportOptions::new(ts("2005-09-01 00:00:00")))
            .run()
            .await
            .expect("pipeline should run");

        let json = set.render(OutputFormat::Json).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["revenue_by_category"][0]["category"], "Action");
        assert_eq!(value["revenue_by_category"][0]["revenue"], 4.99);

        let yaml = set.render(OutputFormat::Yaml).expect("yaml");
        assert!(yaml.contains("revenue_by_category:"));
    }

    #[test]
    fn test_revenue_totals_detect_disagreement() {
        let totals = RevenueTotals {
            by_category: Decimal::new(798, 2),
            by_month: Decimal::new(798, 2),
            by_store: Decimal::new(799, 2),
        };
        assert!(!totals.is_conserved());
    }

    #[test]
    fn test_options_from_config() {
        let config = ReportsConfig {
            churn_window_days: 45,
            top_n: 3,
            as_of: Some(ts("2006-02-14 15:16:03")),
        };
        let options = ReportOptions::from_config(&config);
        assert_eq!(options.churn_window_days, 45);
        assert_eq!(options.top_n, 3);
        assert_eq!(options.churn_cutoff(), ts("2005-12-31 15:16:03"));
    }
}
