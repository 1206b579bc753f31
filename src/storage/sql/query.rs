//! SQL database abstraction trait.

use sea_query::{InsertStatement, SchemaStatementBuilder, SelectStatement};

/// Trait for SQL database backends.
///
/// Abstracts over the SQL databases the reports run on (SQLite, PostgreSQL)
/// by providing the pool type, statement rendering and the handful of
/// expressions whose syntax differs between dialects.
pub trait SqlDatabase: Send + Sync + 'static {
    /// The connection pool type for this database.
    type Pool: Clone + Send + Sync;

    /// Backend name used in logs.
    const NAME: &'static str;

    /// Build a SQL query string from a sea-query SELECT statement.
    fn build_select(stmt: SelectStatement) -> String;

    /// Build a SQL query string from a sea-query INSERT statement.
    fn build_insert(stmt: InsertStatement) -> String;

    /// Build a DDL string from a sea-query schema statement.
    fn build_schema<T: SchemaStatementBuilder>(stmt: T) -> String;

    /// Expression rendering `column` as a `YYYY-MM` string.
    fn month_key(column: &str) -> String;

    /// Expression for whole hours between two timestamp columns, truncated
    /// toward zero and NULL when either side is NULL.
    fn elapsed_hours(from: &str, to: &str) -> String;

    /// Statements that define `name` as `select`, replacing any previous
    /// definition.
    fn replace_view(name: &str, select: &str) -> Vec<String>;

    /// Statement run first in a read transaction so that every read sees the
    /// same snapshot, if the backend needs one.
    fn snapshot_isolation() -> Option<&'static str>;
}
