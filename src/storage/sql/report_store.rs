//! Unified SQL ReportStore implementation.
//!
//! Uses a macro to generate implementations for each SQL backend,
//! eliminating code duplication while maintaining type safety.

use std::marker::PhantomData;

use super::SqlDatabase;

/// SQL-based implementation of ReportStore.
///
/// This generic implementation works with any SQL database that implements
/// the `SqlDatabase` trait (PostgreSQL, SQLite). The views are defined in
/// the database by `install_views`; every report is a single query.
pub struct SqlReportStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlReportStore<DB> {
    /// Create a new SQL report store with the given pool.
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &DB::Pool {
        &self.pool
    }
}

/// Macro to implement ReportStore, plus the fixture helpers, for a
/// specific SQL backend.
macro_rules! impl_report_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        impl SqlReportStore<$db_type> {
            /// Create the base tables and their indexes if they are missing.
            ///
            /// Production databases already own these tables; this exists for
            /// loading fixtures into an empty database.
            pub async fn create_schema(&self) -> crate::error::Result<()> {
                use crate::storage::schema::{base_indexes, base_tables};

                for table in base_tables() {
                    let sql = <$db_type>::build_schema(table);
                    sqlx::query(&sql).execute(&self.pool).await?;
                }
                for index in base_indexes() {
                    let sql = <$db_type>::build_schema(index);
                    sqlx::query(&sql).execute(&self.pool).await?;
                }
                Ok(())
            }

            /// Append every row of `dataset` to the base tables in one
            /// transaction.
            pub async fn insert_dataset(
                &self,
                dataset: &crate::model::Dataset,
            ) -> crate::error::Result<()> {
                let statements = super::statements::insert_dataset(dataset)?;

                let mut tx = self.pool.begin().await?;
                for stmt in statements {
                    let sql = <$db_type>::build_insert(stmt);
                    sqlx::query(&sql).execute(&mut *tx).await?;
                }
                tx.commit().await?;

                let backend = <$db_type>::NAME;
                tracing::debug!(
                    backend,
                    payments = dataset.payments.len(),
                    rentals = dataset.rentals.len(),
                    customers = dataset.customers.len(),
                    "Dataset inserted"
                );
                Ok(())
            }

            /// Read every base relation into an in-memory snapshot.
            ///
            /// All seven reads share one transaction, so a concurrent writer
            /// cannot leave the snapshot with payments for rentals it lacks.
            pub async fn load_dataset(&self) -> crate::error::Result<crate::model::Dataset> {
                use sqlx::Row;

                use super::decode;
                use super::statements::select_base;
                use crate::model::{
                    BaseTable, Category, Customer, Dataset, Film, FilmCategory, InventoryItem,
                    Payment, Rental,
                };

                let mut tx = self.pool.begin().await?;
                if let Some(isolation) = <$db_type>::snapshot_isolation() {
                    sqlx::query(isolation).execute(&mut *tx).await?;
                }

                let mut dataset = Dataset::new();

                let sql = <$db_type>::build_select(select_base(BaseTable::Payment));
                for row in sqlx::query(&sql).fetch_all(&mut *tx).await? {
                    dataset.payments.push(Payment {
                        payment_id: row.try_get("payment_id")?,
                        customer_id: row.try_get("customer_id")?,
                        rental_id: row.try_get("rental_id")?,
                        amount: decode::opt_amount("amount", row.try_get("amount")?)?,
                        payment_date: decode::timestamp("payment_date", row.try_get("payment_date")?)?,
                    });
                }

                let sql = <$db_type>::build_select(select_base(BaseTable::Rental));
                for row in sqlx::query(&sql).fetch_all(&mut *tx).await? {
                    dataset.rentals.push(Rental {
                        rental_id: row.try_get("rental_id")?,
                        customer_id: row.try_get("customer_id")?,
                        inventory_id: row.try_get("inventory_id")?,
                        rental_date: decode::opt_timestamp("rental_date", row.try_get("rental_date")?)?,
                        return_date: decode::opt_timestamp("return_date", row.try_get("return_date")?)?,
                    });
                }

                let sql = <$db_type>::build_select(select_base(BaseTable::Inventory));
                for row in sqlx::query(&sql).fetch_all(&mut *tx).await? {
                    dataset.inventory.push(InventoryItem {
                        inventory_id: row.try_get("inventory_id")?,
                        film_id: row.try_get("film_id")?,
                        store_id: row.try_get("store_id")?,
                    });
                }

                let sql = <$db_type>::build_select(select_base(BaseTable::Film));
                for row in sqlx::query(&sql).fetch_all(&mut *tx).await? {
                    dataset.films.push(Film {
                        film_id: row.try_get("film_id")?,
                        title: row.try_get("title")?,
                        rental_duration: row.try_get("rental_duration")?,
                        rental_rate: decode::amount("rental_rate", row.try_get("rental_rate")?)?,
                    });
                }

                let sql = <$db_type>::build_select(select_base(BaseTable::Category));
                for row in sqlx::query(&sql).fetch_all(&mut *tx).await? {
                    dataset.categories.push(Category {
                        category_id: row.try_get("category_id")?,
                        name: row.try_get("name")?,
                    });
                }

                let sql = <$db_type>::build_select(select_base(BaseTable::FilmCategory));
                for row in sqlx::query(&sql).fetch_all(&mut *tx).await? {
                    dataset.film_categories.push(FilmCategory {
                        film_id: row.try_get("film_id")?,
                        category_id: row.try_get("category_id")?,
                    });
                }

                let sql = <$db_type>::build_select(select_base(BaseTable::Customer));
                for row in sqlx::query(&sql).fetch_all(&mut *tx).await? {
                    dataset.customers.push(Customer {
                        customer_id: row.try_get("customer_id")?,
                        first_name: row.try_get("first_name")?,
                        last_name: row.try_get("last_name")?,
                        store_id: row.try_get("store_id")?,
                    });
                }

                tx.commit().await?;

                Ok(dataset)
            }
        }

        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::interfaces::ReportStore for SqlReportStore<$db_type> {
            async fn install_views(&self) -> crate::error::Result<()> {
                for sql in super::statements::install_views::<$db_type>() {
                    sqlx::query(&sql).execute(&self.pool).await?;
                }
                let backend = <$db_type>::NAME;
                tracing::debug!(backend, "Views installed");
                Ok(())
            }

            async fn payment_analysis(
                &self,
            ) -> crate::error::Result<Vec<crate::views::PaymentAnalysisRow>> {
                use sqlx::Row;

                use super::decode;

                let sql = <$db_type>::build_select(super::statements::select_payment_analysis());
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.into_iter()
                    .map(|row| {
                        Ok(crate::views::PaymentAnalysisRow {
                            payment_id: row.try_get("payment_id")?,
                            customer_id: row.try_get("customer_id")?,
                            first_name: row.try_get("first_name")?,
                            last_name: row.try_get("last_name")?,
                            store_id: row.try_get("store_id")?,
                            payment_amount: decode::opt_amount(
                                "payment_amount",
                                row.try_get("payment_amount")?,
                            )?,
                            payment_date: decode::timestamp(
                                "payment_date",
                                row.try_get("payment_date")?,
                            )?,
                            category: row.try_get("category")?,
                            film_title: row.try_get("film_title")?,
                            rental_date: decode::opt_timestamp(
                                "rental_date",
                                row.try_get("rental_date")?,
                            )?,
                            return_date: decode::opt_timestamp(
                                "return_date",
                                row.try_get("return_date")?,
                            )?,
                        })
                    })
                    .collect()
            }

            async fn rental_clean(&self) -> crate::error::Result<Vec<crate::views::RentalCleanRow>> {
                use sqlx::Row;

                use super::decode;

                let sql = <$db_type>::build_select(super::statements::select_rental_clean());
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.into_iter()
                    .map(|row| {
                        Ok(crate::views::RentalCleanRow {
                            rental_id: row.try_get("rental_id")?,
                            customer_id: row.try_get("customer_id")?,
                            inventory_id: row.try_get("inventory_id")?,
                            rental_date: decode::opt_timestamp(
                                "rental_date",
                                row.try_get("rental_date")?,
                            )?,
                            return_date: decode::opt_timestamp(
                                "return_date",
                                row.try_get("return_date")?,
                            )?,
                            rental_hours: row.try_get("rental_hours")?,
                        })
                    })
                    .collect()
            }

            async fn row_counts(&self) -> crate::error::Result<Vec<crate::reports::TableRowCount>> {
                use sqlx::Row;

                use crate::model::BaseTable;

                let mut counts = Vec::with_capacity(BaseTable::ALL.len());
                for table in BaseTable::ALL {
                    let sql = <$db_type>::build_select(super::statements::row_count(table));
                    let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
                    counts.push(crate::reports::TableRowCount {
                        table: table.to_string(),
                        row_count: row.try_get("row_count")?,
                    });
                }
                Ok(counts)
            }

            async fn missing_values(&self) -> crate::error::Result<crate::reports::MissingValueAudit> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(super::statements::missing_rental_dates());
                let rentals = sqlx::query(&sql).fetch_one(&self.pool).await?;

                let sql = <$db_type>::build_select(super::statements::missing_amounts());
                let payments = sqlx::query(&sql).fetch_one(&self.pool).await?;

                Ok(crate::reports::MissingValueAudit {
                    missing_rental_date: rentals.try_get("missing_rental_date")?,
                    missing_return_date: rentals.try_get("missing_return_date")?,
                    missing_amount: payments.try_get("missing_amount")?,
                })
            }

            async fn duplicate_rentals(
                &self,
            ) -> crate::error::Result<Vec<crate::reports::DuplicateRental>> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(super::statements::duplicate_rentals());
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.into_iter()
                    .map(|row| {
                        Ok(crate::reports::DuplicateRental {
                            rental_id: row.try_get("rental_id")?,
                            occurrences: row.try_get("occurrences")?,
                        })
                    })
                    .collect()
            }

            async fn revenue_by_category(
                &self,
            ) -> crate::error::Result<Vec<crate::reports::CategoryRevenue>> {
                use sqlx::Row;

                use super::decode;

                let sql = <$db_type>::build_select(super::statements::revenue_by_category());
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.into_iter()
                    .map(|row| {
                        Ok(crate::reports::CategoryRevenue {
                            category: row.try_get("category")?,
                            revenue: crate::reports::round_money(decode::amount(
                                "revenue",
                                row.try_get("revenue")?,
                            )?),
                        })
                    })
                    .collect()
            }

            async fn monthly_revenue(
                &self,
            ) -> crate::error::Result<Vec<crate::reports::MonthlyRevenue>> {
                use sqlx::Row;

                use super::decode;

                let sql =
                    <$db_type>::build_select(super::statements::monthly_revenue::<$db_type>());
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.into_iter()
                    .map(|row| {
                        Ok(crate::reports::MonthlyRevenue {
                            month: row.try_get("month")?,
                            revenue: crate::reports::round_money(decode::amount(
                                "revenue",
                                row.try_get("revenue")?,
                            )?),
                        })
                    })
                    .collect()
            }

            async fn store_performance(
                &self,
            ) -> crate::error::Result<Vec<crate::reports::StorePerformance>> {
                use sqlx::Row;

                use super::decode;

                let sql = <$db_type>::build_select(super::statements::store_performance());
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.into_iter()
                    .map(|row| {
                        Ok(crate::reports::StorePerformance {
                            store_id: row.try_get("store_id")?,
                            revenue: crate::reports::round_money(decode::amount(
                                "revenue",
                                row.try_get("revenue")?,
                            )?),
                            customers: row.try_get("customers")?,
                        })
                    })
                    .collect()
            }

            async fn top_customers(
                &self,
                limit: usize,
            ) -> crate::error::Result<Vec<crate::reports::CustomerLifetimeValue>> {
                use sqlx::Row;

                use super::decode;

                let sql = <$db_type>::build_select(super::statements::top_customers(limit));
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.into_iter()
                    .map(|row| {
                        Ok(crate::reports::CustomerLifetimeValue {
                            customer_id: row.try_get("customer_id")?,
                            first_name: row.try_get("first_name")?,
                            last_name: row.try_get("last_name")?,
                            total_spent: crate::reports::round_money(decode::amount(
                                "total_spent",
                                row.try_get("total_spent")?,
                            )?),
                            payment_count: row.try_get("payment_count")?,
                        })
                    })
                    .collect()
            }

            async fn most_rented_films(
                &self,
                limit: usize,
            ) -> crate::error::Result<Vec<crate::reports::FilmRentalCount>> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(super::statements::most_rented_films(limit));
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.into_iter()
                    .map(|row| {
                        Ok(crate::reports::FilmRentalCount {
                            film_title: row.try_get("film_title")?,
                            rental_count: row.try_get("rental_count")?,
                        })
                    })
                    .collect()
            }

            async fn inactive_customers(
                &self,
                cutoff: chrono::NaiveDateTime,
            ) -> crate::error::Result<Vec<crate::reports::InactiveCustomer>> {
                use sqlx::Row;

                use super::decode;

                let sql =
                    <$db_type>::build_select(super::statements::inactive_customers(&cutoff));
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.into_iter()
                    .map(|row| {
                        Ok(crate::reports::InactiveCustomer {
                            customer_id: row.try_get("customer_id")?,
                            first_name: row.try_get("first_name")?,
                            last_name: row.try_get("last_name")?,
                            last_rental_date: decode::opt_timestamp(
                                "last_rental_date",
                                row.try_get("last_rental_date")?,
                            )?,
                        })
                    })
                    .collect()
            }

            async fn rental_durations(
                &self,
            ) -> crate::error::Result<crate::reports::RentalDurationAudit> {
                use sqlx::Row;

                use super::decode;

                let sql = <$db_type>::build_select(super::statements::rental_durations());
                let row = sqlx::query(&sql).fetch_one(&self.pool).await?;

                Ok(crate::reports::RentalDurationAudit {
                    total_rentals: row.try_get("total_rentals")?,
                    outstanding_rentals: row.try_get("outstanding_rentals")?,
                    negative_durations: row.try_get("negative_durations")?,
                    average_rental_hours: decode::opt_amount(
                        "average_rental_hours",
                        row.try_get("average_rental_hours")?,
                    )?
                    .map(crate::reports::round_money),
                })
            }
        }
    };
}

// Generate implementations for each database backend
#[cfg(feature = "postgres")]
use super::postgres::Postgres;
#[cfg(feature = "sqlite")]
use super::sqlite::Sqlite;

impl_report_store!(Postgres, "postgres");
impl_report_store!(Sqlite, "sqlite");
