//! Metrics layer.
//!
//! Each report is a pure function over the normalized relations (the churn
//! report reads the base relations directly). Reports never depend on one
//! another, so any subset can be evaluated in any order.
//!
//! Monetary totals are exact decimal sums rounded to cents when the group is
//! aggregated, so repeated runs over identical input are bit-for-bit equal.

mod audit;
mod customers;
mod films;
mod revenue;

pub use audit::{duplicate_rentals, missing_values, rental_durations, row_counts};
pub use customers::{churn_cutoff, inactive_customers, top_customers};
pub use films::most_rented_films;
pub use revenue::{month_key, monthly_revenue, revenue_by_category, store_performance};

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Default cap for the top-N reports.
pub const DEFAULT_TOP_N: usize = 10;
/// Default inactivity window for the churn report.
pub const DEFAULT_CHURN_WINDOW_DAYS: i64 = 90;

/// Round a monetary amount to cents, halves away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum the present amounts. Absent amounts contribute nothing.
pub(crate) fn sum_amounts<'a, I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = &'a Option<Decimal>>,
{
    amounts.into_iter().flatten().copied().sum()
}

/// Row count of one base relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRowCount {
    pub table: String,
    pub row_count: i64,
}

/// Null counts for the nullable columns the audit cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingValueAudit {
    pub missing_rental_date: i64,
    pub missing_return_date: i64,
    pub missing_amount: i64,
}

/// A rental identifier seen more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRental {
    pub rental_id: i64,
    pub occurrences: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorePerformance {
    pub store_id: i64,
    pub revenue: Decimal,
    /// Distinct paying customers.
    pub customers: i64,
}

/// Lifetime value of one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerLifetimeValue {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub total_spent: Decimal,
    pub payment_count: i64,
}

/// Rental count of one film title.
///
/// Counts payment-analysis rows, so rentals that were never paid for are
/// not visible here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmRentalCount {
    pub film_title: String,
    pub rental_count: i64,
}

/// A customer with no rental inside the churn window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InactiveCustomer {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    /// `None` when the customer has never rented.
    pub last_rental_date: Option<NaiveDateTime>,
}

/// Data-quality summary of the rental clean relation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalDurationAudit {
    pub total_rentals: i64,
    /// Rentals without a computable duration (not yet returned).
    pub outstanding_rentals: i64,
    /// Rentals returned before they were rented.
    pub negative_durations: i64,
    /// Mean `rental_hours` over returned rentals, rounded to 2 places.
    pub average_rental_hours: Option<Decimal>,
}
