//! In-memory report store.
//!
//! Evaluates views and reports against a [`Dataset`] snapshot with the pure
//! functions in [`crate::views`] and [`crate::reports`]. Used for fixture
//! tests and for evaluating a snapshot loaded from a database.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::RwLock;

use crate::error::{ReportError, Result};
use crate::interfaces::ReportStore;
use crate::model::Dataset;
use crate::reports::{
    self, CategoryRevenue, CustomerLifetimeValue, DuplicateRental, FilmRentalCount,
    InactiveCustomer, MissingValueAudit, MonthlyRevenue, RentalDurationAudit, StorePerformance,
    TableRowCount,
};
use crate::views::{self, PaymentAnalysisRow, RentalCleanRow};


/// Report store backed by an in-memory dataset.
#[derive(Default)]
pub struct MemoryReportStore {
    dataset: RwLock<Dataset>,
    unavailable: RwLock<bool>,
}

impl MemoryReportStore {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: RwLock::new(dataset),
            unavailable: RwLock::new(false),
        }
    }

    /// Swap in a new snapshot. Subsequent reads see only the new data.
    pub async fn replace(&self, dataset: Dataset) {
        *self.dataset.write().await = dataset;
    }

    /// Copy of the current snapshot.
    pub async fn snapshot(&self) -> Dataset {
        self.dataset.read().await.clone()
    }

    /// Make every read fail as if the connection were lost.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    async fn check_available(&self) -> Result<()> {
        if *self.unavailable.read().await {
            return Err(ReportError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }

    async fn with_payment_analysis<T>(
        &self,
        f: impl FnOnce(&[PaymentAnalysisRow]) -> T,
    ) -> Result<T> {
        self.check_available().await?;
        let dataset = self.dataset.read().await;
        Ok(f(&views::payment_analysis(&dataset)))
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn install_views(&self) -> Result<()> {
        // views are computed on read
        self.check_available().await
    }

    async fn payment_analysis(&self) -> Result<Vec<PaymentAnalysisRow>> {
        self.with_payment_analysis(|rows| rows.to_vec()).await
    }

    async fn rental_clean(&self) -> Result<Vec<RentalCleanRow>> {
        self.check_available().await?;
        Ok(views::rental_clean(&*self.dataset.read().await))
    }

    async fn row_counts(&self) -> Result<Vec<TableRowCount>> {
        self.check_available().await?;
        Ok(reports::row_counts(&*self.dataset.read().await))
    }

    async fn missing_values(&self) -> Result<MissingValueAudit> {
        self.check_available().await?;
        Ok(reports::missing_values(&*self.dataset.read().await))
    }

    async fn duplicate_rentals(&self) -> Result<Vec<DuplicateRental>> {
        self.check_available().await?;
        Ok(reports::duplicate_rentals(&*self.dataset.read().await))
    }

    async fn revenue_by_category(&self) -> Result<Vec<CategoryRevenue>> {
        self.with_payment_analysis(reports::revenue_by_category).await
    }

    async fn monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>> {
        self.with_payment_analysis(reports::monthly_revenue).await
    }

    async fn store_performance(&self) -> Result<Vec<StorePerformance>> {
        self.with_payment_analysis(reports::store_performance).await
    }

    async fn top_customers(&self, limit: usize) -> Result<Vec<CustomerLifetimeValue>> {
        self.with_payment_analysis(|rows| reports::top_customers(rows, limit))
            .await
    }

    async fn most_rented_films(&self, limit: usize) -> Result<Vec<FilmRentalCount>> {
        self.with_payment_analysis(|rows| reports::most_rented_films(rows, limit))
            .await
    }

    async fn inactive_customers(&self, cutoff: NaiveDateTime) -> Result<Vec<InactiveCustomer>> {
        self.check_available().await?;
        Ok(reports::inactive_customers(&*self.dataset.read().await, cutoff))
    }

    async fn rental_durations(&self) -> Result<RentalDurationAudit> {
        self.check_available().await?;
        let rows = views::rental_clean(&*self.dataset.read().await);
        Ok(reports::rental_durations(&rows))
    }
}
