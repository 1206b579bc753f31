//! sea-query statement builders for views, reports and fixture loading.
//!
//! Each builder returns an unrendered statement; `SqlDatabase` renders it
//! for a backend. Aggregates that must read back identically on every
//! backend (money, timestamps) are cast to TEXT, identifiers to BIGINT.

use sea_query::{
    Alias, Expr, InsertStatement, NullOrdering, Order, Query, SelectStatement, SimpleExpr,
};

use chrono::NaiveDateTime;

use super::SqlDatabase;
use crate::model::{format_timestamp, BaseTable, Dataset};
use crate::storage::schema::{
    Category, Customer, Film, FilmCategory, Inventory, Payment, PaymentAnalysis, Rental,
    RentalClean,
};

/// View names.
pub const PAYMENT_ANALYSIS_VIEW: &str = "payment_analysis";
pub const RENTAL_CLEAN_VIEW: &str = "rental_clean";

/// Rows per INSERT when loading fixtures.
const INSERT_BATCH: usize = 500;

/// Revenue expression over the payment analysis view.
const REVENUE: &str = "ROUND(COALESCE(SUM(payment_amount), 0), 2)";

fn cust(sql: impl Into<String>) -> SimpleExpr {
    Expr::cust(sql.into())
}

fn bigint(column: &str) -> SimpleExpr {
    cust(format!("CAST({column} AS BIGINT)"))
}

fn text(expr: &str) -> SimpleExpr {
    cust(format!("CAST({expr} AS TEXT)"))
}

fn alias(name: &str) -> Alias {
    Alias::new(name)
}

// =============================================================================
// Views
// =============================================================================

/// SELECT behind the `payment_analysis` view.
///
/// Inner joins throughout: a payment missing any link of
/// rental → inventory → film → film_category → category, or its customer,
/// does not appear.
pub fn payment_analysis_view() -> SelectStatement {
    Query::select()
        .expr_as(Expr::col((Payment::Table, Payment::PaymentId)), alias("payment_id"))
        .expr_as(Expr::col((Payment::Table, Payment::CustomerId)), alias("customer_id"))
        .expr_as(Expr::col((Customer::Table, Customer::FirstName)), alias("first_name"))
        .expr_as(Expr::col((Customer::Table, Customer::LastName)), alias("last_name"))
        .expr_as(Expr::col((Customer::Table, Customer::StoreId)), alias("store_id"))
        .expr_as(Expr::col((Payment::Table, Payment::Amount)), alias("payment_amount"))
        .expr_as(Expr::col((Payment::Table, Payment::PaymentDate)), alias("payment_date"))
        .expr_as(Expr::col((Category::Table, Category::Name)), alias("category"))
        .expr_as(Expr::col((Film::Table, Film::Title)), alias("film_title"))
        .expr_as(Expr::col((Rental::Table, Rental::RentalDate)), alias("rental_date"))
        .expr_as(Expr::col((Rental::Table, Rental::ReturnDate)), alias("return_date"))
        .from(Payment::Table)
        .inner_join(
            Rental::Table,
            Expr::col((Payment::Table, Payment::RentalId)).equals((Rental::Table, Rental::RentalId)),
        )
        .inner_join(
            Inventory::Table,
            Expr::col((Rental::Table, Rental::InventoryId))
                .equals((Inventory::Table, Inventory::InventoryId)),
        )
        .inner_join(
            Film::Table,
            Expr::col((Inventory::Table, Inventory::FilmId)).equals((Film::Table, Film::FilmId)),
        )
        .inner_join(
            FilmCategory::Table,
            Expr::col((Film::Table, Film::FilmId)).equals((FilmCategory::Table, FilmCategory::FilmId)),
        )
        .inner_join(
            Category::Table,
            Expr::col((FilmCategory::Table, FilmCategory::CategoryId))
                .equals((Category::Table, Category::CategoryId)),
        )
        .inner_join(
            Customer::Table,
            Expr::col((Payment::Table, Payment::CustomerId))
                .equals((Customer::Table, Customer::CustomerId)),
        )
        .to_owned()
}

/// SELECT behind the `rental_clean` view.
pub fn rental_clean_view<DB: SqlDatabase>() -> SelectStatement {
    Query::select()
        .columns([
            Rental::RentalId,
            Rental::CustomerId,
            Rental::InventoryId,
            Rental::RentalDate,
            Rental::ReturnDate,
        ])
        .expr_as(
            cust(DB::elapsed_hours("rental_date", "return_date")),
            alias("rental_hours"),
        )
        .from(Rental::Table)
        .to_owned()
}

/// DDL statements (re)defining both views.
pub fn install_views<DB: SqlDatabase>() -> Vec<String> {
    let mut statements =
        DB::replace_view(PAYMENT_ANALYSIS_VIEW, &DB::build_select(payment_analysis_view()));
    statements.extend(DB::replace_view(
        RENTAL_CLEAN_VIEW,
        &DB::build_select(rental_clean_view::<DB>()),
    ));
    statements
}

/// Read the payment analysis view.
pub fn select_payment_analysis() -> SelectStatement {
    Query::select()
        .expr_as(bigint("payment_id"), alias("payment_id"))
        .expr_as(bigint("customer_id"), alias("customer_id"))
        .columns([PaymentAnalysis::FirstName, PaymentAnalysis::LastName])
        .expr_as(bigint("store_id"), alias("store_id"))
        .expr_as(text("payment_amount"), alias("payment_amount"))
        .expr_as(text("payment_date"), alias("payment_date"))
        .columns([PaymentAnalysis::Category, PaymentAnalysis::FilmTitle])
        .expr_as(text("rental_date"), alias("rental_date"))
        .expr_as(text("return_date"), alias("return_date"))
        .from(PaymentAnalysis::Table)
        .order_by(PaymentAnalysis::PaymentId, Order::Asc)
        .order_by(PaymentAnalysis::Category, Order::Asc)
        .to_owned()
}

/// Read the rental clean view.
pub fn select_rental_clean() -> SelectStatement {
    Query::select()
        .expr_as(bigint("rental_id"), alias("rental_id"))
        .expr_as(bigint("customer_id"), alias("customer_id"))
        .expr_as(bigint("inventory_id"), alias("inventory_id"))
        .expr_as(text("rental_date"), alias("rental_date"))
        .expr_as(text("return_date"), alias("return_date"))
        .expr_as(bigint("rental_hours"), alias("rental_hours"))
        .from(RentalClean::Table)
        .order_by(RentalClean::RentalId, Order::Asc)
        .to_owned()
}

// =============================================================================
// Audits
// =============================================================================

/// `SELECT COUNT(*) AS row_count FROM <table>`.
pub fn row_count(table: BaseTable) -> SelectStatement {
    Query::select()
        .expr_as(cust("COUNT(*)"), alias("row_count"))
        .from(alias(table.as_str()))
        .to_owned()
}

/// Null rental and return dates.
pub fn missing_rental_dates() -> SelectStatement {
    Query::select()
        .expr_as(
            cust("COUNT(*) - COUNT(rental_date)"),
            alias("missing_rental_date"),
        )
        .expr_as(
            cust("COUNT(*) - COUNT(return_date)"),
            alias("missing_return_date"),
        )
        .from(Rental::Table)
        .to_owned()
}

/// Null payment amounts.
pub fn missing_amounts() -> SelectStatement {
    Query::select()
        .expr_as(cust("COUNT(*) - COUNT(amount)"), alias("missing_amount"))
        .from(Payment::Table)
        .to_owned()
}

/// Rental identifiers occurring more than once.
pub fn duplicate_rentals() -> SelectStatement {
    Query::select()
        .expr_as(bigint("rental_id"), alias("rental_id"))
        .expr_as(cust("COUNT(*)"), alias("occurrences"))
        .from(Rental::Table)
        .group_by_col(Rental::RentalId)
        .and_having(Expr::expr(cust("COUNT(*)")).gt(1))
        .order_by(Rental::RentalId, Order::Asc)
        .to_owned()
}

/// Duration summary over the rental clean view.
pub fn rental_durations() -> SelectStatement {
    Query::select()
        .expr_as(cust("COUNT(*)"), alias("total_rentals"))
        .expr_as(
            cust("COUNT(*) - COUNT(rental_hours)"),
            alias("outstanding_rentals"),
        )
        .expr_as(
            cust("COUNT(CASE WHEN rental_hours < 0 THEN 1 END)"),
            alias("negative_durations"),
        )
        .expr_as(
            text("ROUND(AVG(rental_hours), 2)"),
            alias("average_rental_hours"),
        )
        .from(RentalClean::Table)
        .to_owned()
}

// =============================================================================
// Revenue and customers
// =============================================================================

pub fn revenue_by_category() -> SelectStatement {
    Query::select()
        .column(PaymentAnalysis::Category)
        .expr_as(text(REVENUE), alias("revenue"))
        .from(PaymentAnalysis::Table)
        .group_by_col(PaymentAnalysis::Category)
        .order_by_expr(cust(REVENUE), Order::Desc)
        .order_by(PaymentAnalysis::Category, Order::Asc)
        .to_owned()
}

pub fn monthly_revenue<DB: SqlDatabase>() -> SelectStatement {
    let month = DB::month_key("payment_date");
    Query::select()
        .expr_as(cust(month.clone()), alias("month"))
        .expr_as(text(REVENUE), alias("revenue"))
        .from(PaymentAnalysis::Table)
        .add_group_by([cust(month.clone())])
        .order_by_expr(cust(month), Order::Asc)
        .to_owned()
}

pub fn store_performance() -> SelectStatement {
    Query::select()
        .expr_as(bigint("store_id"), alias("store_id"))
        .expr_as(text(REVENUE), alias("revenue"))
        .expr_as(cust("COUNT(DISTINCT customer_id)"), alias("customers"))
        .from(PaymentAnalysis::Table)
        .group_by_col(PaymentAnalysis::StoreId)
        .order_by_expr(cust(REVENUE), Order::Desc)
        .order_by(PaymentAnalysis::StoreId, Order::Asc)
        .to_owned()
}

pub fn top_customers(limit: usize) -> SelectStatement {
    Query::select()
        .expr_as(bigint("customer_id"), alias("customer_id"))
        .columns([PaymentAnalysis::FirstName, PaymentAnalysis::LastName])
        .expr_as(text(REVENUE), alias("total_spent"))
        .expr_as(cust("COUNT(payment_id)"), alias("payment_count"))
        .from(PaymentAnalysis::Table)
        .group_by_col(PaymentAnalysis::CustomerId)
        .group_by_col(PaymentAnalysis::FirstName)
        .group_by_col(PaymentAnalysis::LastName)
        .order_by_expr(cust(REVENUE), Order::Desc)
        .order_by(PaymentAnalysis::CustomerId, Order::Asc)
        .order_by(PaymentAnalysis::LastName, Order::Asc)
        .order_by(PaymentAnalysis::FirstName, Order::Asc)
        .limit(limit as u64)
        .to_owned()
}

pub fn most_rented_films(limit: usize) -> SelectStatement {
    Query::select()
        .column(PaymentAnalysis::FilmTitle)
        .expr_as(cust("COUNT(*)"), alias("rental_count"))
        .from(PaymentAnalysis::Table)
        .group_by_col(PaymentAnalysis::FilmTitle)
        .order_by_expr(cust("COUNT(*)"), Order::Desc)
        .order_by(PaymentAnalysis::FilmTitle, Order::Asc)
        .limit(limit as u64)
        .to_owned()
}

/// Customers whose latest rental predates `cutoff`, or who never rented.
///
/// Reads the base relations: customer LEFT JOIN rental. Timestamps are
/// compared in their text layout, which orders the same as the instants.
pub fn inactive_customers(cutoff: &NaiveDateTime) -> SelectStatement {
    let cutoff = format_timestamp(cutoff);
    let last_rental = || Expr::col((Rental::Table, Rental::RentalDate)).max();

    Query::select()
        .expr_as(bigint("customer.customer_id"), alias("customer_id"))
        .column((Customer::Table, Customer::FirstName))
        .column((Customer::Table, Customer::LastName))
        .expr_as(text("MAX(rental.rental_date)"), alias("last_rental_date"))
        .from(Customer::Table)
        .left_join(
            Rental::Table,
            Expr::col((Customer::Table, Customer::CustomerId))
                .equals((Rental::Table, Rental::CustomerId)),
        )
        .group_by_col((Customer::Table, Customer::CustomerId))
        .group_by_col((Customer::Table, Customer::FirstName))
        .group_by_col((Customer::Table, Customer::LastName))
        .and_having(
            Expr::expr(last_rental())
                .is_null()
                .or(Expr::expr(last_rental()).lt(cutoff.as_str())),
        )
        .order_by_expr_with_nulls(last_rental(), Order::Asc, NullOrdering::First)
        .order_by((Customer::Table, Customer::CustomerId), Order::Asc)
        .to_owned()
}

// =============================================================================
// Snapshot loading
// =============================================================================

/// SELECT reading one base relation back into model rows.
pub fn select_base(table: BaseTable) -> SelectStatement {
    let mut stmt = Query::select();
    match table {
        BaseTable::Payment => stmt
            .expr_as(bigint("payment_id"), alias("payment_id"))
            .expr_as(bigint("customer_id"), alias("customer_id"))
            .expr_as(bigint("rental_id"), alias("rental_id"))
            .expr_as(text("amount"), alias("amount"))
            .expr_as(text("payment_date"), alias("payment_date"))
            .from(Payment::Table)
            .order_by(Payment::PaymentId, Order::Asc),
        BaseTable::Rental => stmt
            .expr_as(bigint("rental_id"), alias("rental_id"))
            .expr_as(bigint("customer_id"), alias("customer_id"))
            .expr_as(bigint("inventory_id"), alias("inventory_id"))
            .expr_as(text("rental_date"), alias("rental_date"))
            .expr_as(text("return_date"), alias("return_date"))
            .from(Rental::Table)
            .order_by(Rental::RentalId, Order::Asc),
        BaseTable::Inventory => stmt
            .expr_as(bigint("inventory_id"), alias("inventory_id"))
            .expr_as(bigint("film_id"), alias("film_id"))
            .expr_as(bigint("store_id"), alias("store_id"))
            .from(Inventory::Table)
            .order_by(Inventory::InventoryId, Order::Asc),
        BaseTable::Film => stmt
            .expr_as(bigint("film_id"), alias("film_id"))
            .column(Film::Title)
            .expr_as(bigint("rental_duration"), alias("rental_duration"))
            .expr_as(text("rental_rate"), alias("rental_rate"))
            .from(Film::Table)
            .order_by(Film::FilmId, Order::Asc),
        BaseTable::Category => stmt
            .expr_as(bigint("category_id"), alias("category_id"))
            .column(Category::Name)
            .from(Category::Table)
            .order_by(Category::CategoryId, Order::Asc),
        BaseTable::FilmCategory => stmt
            .expr_as(bigint("film_id"), alias("film_id"))
            .expr_as(bigint("category_id"), alias("category_id"))
            .from(FilmCategory::Table)
            .order_by(FilmCategory::FilmId, Order::Asc)
            .order_by(FilmCategory::CategoryId, Order::Asc),
        BaseTable::Customer => stmt
            .expr_as(bigint("customer_id"), alias("customer_id"))
            .columns([Customer::FirstName, Customer::LastName])
            .expr_as(bigint("store_id"), alias("store_id"))
            .from(Customer::Table)
            .order_by(Customer::CustomerId, Order::Asc),
    };
    stmt
}

// =============================================================================
// Fixture loading
// =============================================================================

fn batched<T, F>(rows: &[T], mut build: F) -> Result<Vec<InsertStatement>, sea_query::error::Error>
where
    F: FnMut(&[T]) -> Result<InsertStatement, sea_query::error::Error>,
{
    rows.chunks(INSERT_BATCH).map(|chunk| build(chunk)).collect()
}

/// INSERT statements writing every row of `dataset`.
pub fn insert_dataset(
    dataset: &Dataset,
) -> Result<Vec<InsertStatement>, sea_query::error::Error> {
    let mut statements = Vec::new();

    statements.extend(batched(&dataset.payments, |rows| {
        let mut stmt = Query::insert();
        stmt.into_table(Payment::Table).columns([
            Payment::PaymentId,
            Payment::CustomerId,
            Payment::RentalId,
            Payment::Amount,
            Payment::PaymentDate,
        ]);
        for p in rows {
            stmt.values([
                p.payment_id.into(),
                p.customer_id.into(),
                p.rental_id.into(),
                p.amount.map(|a| a.to_string()).into(),
                format_timestamp(&p.payment_date).into(),
            ])?;
        }
        Ok(stmt)
    })?);

    statements.extend(batched(&dataset.rentals, |rows| {
        let mut stmt = Query::insert();
        stmt.into_table(Rental::Table).columns([
            Rental::RentalId,
            Rental::CustomerId,
            Rental::InventoryId,
            Rental::RentalDate,
            Rental::ReturnDate,
        ]);
        for r in rows {
            stmt.values([
                r.rental_id.into(),
                r.customer_id.into(),
                r.inventory_id.into(),
                r.rental_date.as_ref().map(format_timestamp).into(),
                r.return_date.as_ref().map(format_timestamp).into(),
            ])?;
        }
        Ok(stmt)
    })?);

    statements.extend(batched(&dataset.inventory, |rows| {
        let mut stmt = Query::insert();
        stmt.into_table(Inventory::Table).columns([
            Inventory::InventoryId,
            Inventory::FilmId,
            Inventory::StoreId,
        ]);
        for i in rows {
            stmt.values([i.inventory_id.into(), i.film_id.into(), i.store_id.into()])?;
        }
        Ok(stmt)
    })?);

    statements.extend(batched(&dataset.films, |rows| {
        let mut stmt = Query::insert();
        stmt.into_table(Film::Table).columns([
            Film::FilmId,
            Film::Title,
            Film::RentalDuration,
            Film::RentalRate,
        ]);
        for f in rows {
            stmt.values([
                f.film_id.into(),
                f.title.clone().into(),
                f.rental_duration.into(),
                f.rental_rate.to_string().into(),
            ])?;
        }
        Ok(stmt)
    })?);

    statements.extend(batched(&dataset.categories, |rows| {
        let mut stmt = Query::insert();
        stmt.into_table(Category::Table)
            .columns([Category::CategoryId, Category::Name]);
        for c in rows {
            stmt.values([c.category_id.into(), c.name.clone().into()])?;
        }
        Ok(stmt)
    })?);

    statements.extend(batched(&dataset.film_categories, |rows| {
        let mut stmt = Query::insert();
        stmt.into_table(FilmCategory::Table)
            .columns([FilmCategory::FilmId, FilmCategory::CategoryId]);
        for fc in rows {
            stmt.values([fc.film_id.into(), fc.category_id.into()])?;
        }
        Ok(stmt)
    })?);

    statements.extend(batched(&dataset.customers, |rows| {
        let mut stmt = Query::insert();
        stmt.into_table(Customer::Table).columns([
            Customer::CustomerId,
            Customer::FirstName,
            Customer::LastName,
            Customer::StoreId,
        ]);
        for c in rows {
            stmt.values([
                c.customer_id.into(),
                c.first_name.clone().into(),
                c.last_name.clone().into(),
                c.store_id.into(),
            ])?;
        }
        Ok(stmt)
    })?);

    Ok(statements)
}
