//! SQL report store implementations.
//!
//! This module provides the shared implementation for SQL backends
//! (SQLite, PostgreSQL). Statements are built once with sea-query in
//! [`statements`] and rendered per backend through the `SqlDatabase` trait.

mod decode;
mod query;
mod report_store;
pub mod statements;

pub use query::SqlDatabase;
pub use report_store::SqlReportStore;

#[cfg(feature = "postgres")]
pub mod postgres {
    //! PostgreSQL database backend.

    use sea_query::PostgresQueryBuilder;
    use sqlx::PgPool;

    /// PostgreSQL database marker type.
    pub struct Postgres;

    impl super::SqlDatabase for Postgres {
        type Pool = PgPool;

        const NAME: &'static str = "postgres";

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_schema<T: sea_query::SchemaStatementBuilder>(stmt: T) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn month_key(column: &str) -> String {
            format!("TO_CHAR({column}, 'YYYY-MM')")
        }

        fn elapsed_hours(from: &str, to: &str) -> String {
            format!("CAST(TRUNC(EXTRACT(EPOCH FROM ({to} - {from}))) AS BIGINT) / 3600")
        }

        fn replace_view(name: &str, select: &str) -> Vec<String> {
            vec![format!("CREATE OR REPLACE VIEW {name} AS {select}")]
        }

        fn snapshot_isolation() -> Option<&'static str> {
            Some("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
        }
    }

    /// PostgreSQL report store.
    pub type PostgresReportStore = super::SqlReportStore<Postgres>;
}

#[cfg(feature = "sqlite")]
pub mod sqlite {
    //! SQLite database backend.

    use sea_query::SqliteQueryBuilder;
    use sqlx::SqlitePool;

    /// SQLite database marker type.
    pub struct Sqlite;

    impl super::SqlDatabase for Sqlite {
        type Pool = SqlitePool;

        const NAME: &'static str = "sqlite";

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_schema<T: sea_query::SchemaStatementBuilder>(stmt: T) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn month_key(column: &str) -> String {
            format!("strftime('%Y-%m', {column})")
        }

        fn elapsed_hours(from: &str, to: &str) -> String {
            // julianday keeps milliseconds; round to whole ms before truncating
            format!(
                "CAST(ROUND((julianday({to}) - julianday({from})) * 86400000) AS INTEGER) / 3600000"
            )
        }

        fn replace_view(name: &str, select: &str) -> Vec<String> {
            // SQLite has no CREATE OR REPLACE VIEW
            vec![
                format!("DROP VIEW IF EXISTS {name}"),
                format!("CREATE VIEW {name} AS {select}"),
            ]
        }

        fn snapshot_isolation() -> Option<&'static str> {
            // a deferred transaction already reads one snapshot
            None
        }
    }

    /// SQLite report store.
    pub type SqliteReportStore = super::SqlReportStore<Sqlite>;
}
