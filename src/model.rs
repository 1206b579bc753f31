//! Base relations of the rental store dataset.
//!
//! These mirror the tables owned by the database. Nothing in this crate
//! mutates them; a [`Dataset`] is a read-only snapshot that the in-memory
//! engine evaluates views and reports against.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Timestamp layout used when timestamps travel as text. The fraction is
/// printed only when the value has one.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A payment event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: i64,
    pub customer_id: i64,
    pub rental_id: i64,
    /// Nullable only so the missing-value audit can see bad rows.
    pub amount: Option<Decimal>,
    pub payment_date: NaiveDateTime,
}

/// A rental event. `return_date` is `None` until the item comes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    pub rental_id: i64,
    pub customer_id: i64,
    pub inventory_id: i64,
    pub rental_date: Option<NaiveDateTime>,
    pub return_date: Option<NaiveDateTime>,
}

/// A physical copy of a film held by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub inventory_id: i64,
    pub film_id: i64,
    pub store_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub film_id: i64,
    pub title: String,
    /// Rental period in days.
    pub rental_duration: i64,
    pub rental_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
}

/// Many-to-many link between films and categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmCategory {
    pub film_id: i64,
    pub category_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub store_id: i64,
}

/// The seven base relations, in the order audits report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseTable {
    Payment,
    Rental,
    Inventory,
    Film,
    Category,
    FilmCategory,
    Customer,
}

impl BaseTable {
    pub const ALL: [BaseTable; 7] = [
        BaseTable::Payment,
        BaseTable::Rental,
        BaseTable::Inventory,
        BaseTable::Film,
        BaseTable::Category,
        BaseTable::FilmCategory,
        BaseTable::Customer,
    ];

    /// Table name in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseTable::Payment => "payment",
            BaseTable::Rental => "rental",
            BaseTable::Inventory => "inventory",
            BaseTable::Film => "film",
            BaseTable::Category => "category",
            BaseTable::FilmCategory => "film_category",
            BaseTable::Customer => "customer",
        }
    }
}

impl std::fmt::Display for BaseTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of every base relation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub payments: Vec<Payment>,
    pub rentals: Vec<Rental>,
    pub inventory: Vec<InventoryItem>,
    pub films: Vec<Film>,
    pub categories: Vec<Category>,
    pub film_categories: Vec<FilmCategory>,
    pub customers: Vec<Customer>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows held for `table`.
    pub fn row_count(&self, table: BaseTable) -> usize {
        match table {
            BaseTable::Payment => self.payments.len(),
            BaseTable::Rental => self.rentals.len(),
            BaseTable::Inventory => self.inventory.len(),
            BaseTable::Film => self.films.len(),
            BaseTable::Category => self.categories.len(),
            BaseTable::FilmCategory => self.film_categories.len(),
            BaseTable::Customer => self.customers.len(),
        }
    }

    /// True when no relation holds a row.
    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
            && self.rentals.is_empty()
            && self.inventory.is_empty()
            && self.films.is_empty()
            && self.categories.is_empty()
            && self.film_categories.is_empty()
            && self.customers.is_empty()
    }
}

/// Parse a timestamp as the database renders it as text.
///
/// Accepts an optional fractional part and the `T` separator so values
/// from SQLite, Postgres and RFC 3339-ish input all decode.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// Render a timestamp the way it is stored in text columns.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
