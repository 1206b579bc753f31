//! Report store interface.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::Result;
use crate::reports::{
    CategoryRevenue, CustomerLifetimeValue, DuplicateRental, FilmRentalCount, InactiveCustomer,
    MissingValueAudit, MonthlyRevenue, RentalDurationAudit, StorePerformance, TableRowCount,
};
use crate::views::{PaymentAnalysisRow, RentalCleanRow};

/// Read-only access to the normalized views and the reports built on them.
///
/// Every method is an independent query with no side effects, except
/// `install_views`, which (re)defines the two views and is idempotent.
///
/// Implementations:
/// - `MemoryReportStore`: evaluates an in-memory `Dataset`
/// - `SqliteReportStore`: SQLite database
/// - `PostgresReportStore`: PostgreSQL database
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Define (or redefine) the `payment_analysis` and `rental_clean` views.
    async fn install_views(&self) -> Result<()>;

    /// All payment analysis rows, ordered by payment then category.
    async fn payment_analysis(&self) -> Result<Vec<PaymentAnalysisRow>>;

    /// All rental clean rows, ordered by rental.
    async fn rental_clean(&self) -> Result<Vec<RentalCleanRow>>;

    /// Row count of each base relation.
    async fn row_counts(&self) -> Result<Vec<TableRowCount>>;

    /// Null counts of rental dates, return dates and payment amounts.
    async fn missing_values(&self) -> Result<MissingValueAudit>;

    /// Rental identifiers occurring more than once.
    async fn duplicate_rentals(&self) -> Result<Vec<DuplicateRental>>;

    async fn revenue_by_category(&self) -> Result<Vec<CategoryRevenue>>;

    async fn monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>>;

    async fn store_performance(&self) -> Result<Vec<StorePerformance>>;

    /// Highest lifetime spend, at most `limit` customers.
    async fn top_customers(&self, limit: usize) -> Result<Vec<CustomerLifetimeValue>>;

    /// Most rented titles, at most `limit` films.
    async fn most_rented_films(&self, limit: usize) -> Result<Vec<FilmRentalCount>>;

    /// Customers whose last rental is strictly before `cutoff`, or who never
    /// rented.
    async fn inactive_customers(&self, cutoff: NaiveDateTime) -> Result<Vec<InactiveCustomer>>;

    /// Duration summary of the rental clean view.
    async fn rental_durations(&self) -> Result<RentalDurationAudit>;
}
