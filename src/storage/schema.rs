//! Database schema definitions using sea-query.
//!
//! These define the table, view and column identifiers for type-safe query
//! building. The base tables belong to the dataset; [`base_tables`] and
//! [`base_indexes`] exist so fixtures can be loaded into an empty database.

use sea_query::{ColumnDef, Iden, Index, IndexCreateStatement, Table, TableCreateStatement};

/// Payment table schema.
#[derive(Iden)]
pub enum Payment {
    #[iden = "payment"]
    Table,
    #[iden = "payment_id"]
    PaymentId,
    #[iden = "customer_id"]
    CustomerId,
    #[iden = "rental_id"]
    RentalId,
    #[iden = "amount"]
    Amount,
    #[iden = "payment_date"]
    PaymentDate,
}

/// Rental table schema.
#[derive(Iden)]
pub enum Rental {
    #[iden = "rental"]
    Table,
    #[iden = "rental_id"]
    RentalId,
    #[iden = "customer_id"]
    CustomerId,
    #[iden = "inventory_id"]
    InventoryId,
    #[iden = "rental_date"]
    RentalDate,
    #[iden = "return_date"]
    ReturnDate,
}

/// Inventory table schema.
#[derive(Iden)]
pub enum Inventory {
    #[iden = "inventory"]
    Table,
    #[iden = "inventory_id"]
    InventoryId,
    #[iden = "film_id"]
    FilmId,
    #[iden = "store_id"]
    StoreId,
}

/// Film table schema.
#[derive(Iden)]
pub enum Film {
    #[iden = "film"]
    Table,
    #[iden = "film_id"]
    FilmId,
    #[iden = "title"]
    Title,
    #[iden = "rental_duration"]
    RentalDuration,
    #[iden = "rental_rate"]
    RentalRate,
}

/// Category table schema.
#[derive(Iden)]
pub enum Category {
    #[iden = "category"]
    Table,
    #[iden = "category_id"]
    CategoryId,
    #[iden = "name"]
    Name,
}

/// Film-category link table schema.
#[derive(Iden)]
pub enum FilmCategory {
    #[iden = "film_category"]
    Table,
    #[iden = "film_id"]
    FilmId,
    #[iden = "category_id"]
    CategoryId,
}

/// Customer table schema.
#[derive(Iden)]
pub enum Customer {
    #[iden = "customer"]
    Table,
    #[iden = "customer_id"]
    CustomerId,
    #[iden = "first_name"]
    FirstName,
    #[iden = "last_name"]
    LastName,
    #[iden = "store_id"]
    StoreId,
}

/// `payment_analysis` view columns.
#[derive(Iden)]
pub enum PaymentAnalysis {
    #[iden = "payment_analysis"]
    Table,
    #[iden = "payment_id"]
    PaymentId,
    #[iden = "customer_id"]
    CustomerId,
    #[iden = "first_name"]
    FirstName,
    #[iden = "last_name"]
    LastName,
    #[iden = "store_id"]
    StoreId,
    #[iden = "payment_amount"]
    PaymentAmount,
    #[iden = "payment_date"]
    PaymentDate,
    #[iden = "category"]
    Category,
    #[iden = "film_title"]
    FilmTitle,
    #[iden = "rental_date"]
    RentalDate,
    #[iden = "return_date"]
    ReturnDate,
}

/// `rental_clean` view columns.
#[derive(Iden)]
pub enum RentalClean {
    #[iden = "rental_clean"]
    Table,
    #[iden = "rental_id"]
    RentalId,
    #[iden = "customer_id"]
    CustomerId,
    #[iden = "inventory_id"]
    InventoryId,
    #[iden = "rental_date"]
    RentalDate,
    #[iden = "return_date"]
    ReturnDate,
    #[iden = "rental_hours"]
    RentalHours,
}

/// CREATE TABLE statements for the seven base relations.
///
/// No primary keys: the duplicate-rental audit must be able to see
/// repeated identifiers in imported data.
pub fn base_tables() -> Vec<TableCreateStatement> {
    vec![
        Table::create()
            .table(Payment::Table)
            .if_not_exists()
            .col(ColumnDef::new(Payment::PaymentId).big_integer().not_null())
            .col(ColumnDef::new(Payment::CustomerId).big_integer().not_null())
            .col(ColumnDef::new(Payment::RentalId).big_integer().not_null())
            .col(ColumnDef::new(Payment::Amount).decimal_len(5, 2))
            .col(ColumnDef::new(Payment::PaymentDate).timestamp().not_null())
            .to_owned(),
        Table::create()
            .table(Rental::Table)
            .if_not_exists()
            .col(ColumnDef::new(Rental::RentalId).big_integer().not_null())
            .col(ColumnDef::new(Rental::CustomerId).big_integer().not_null())
            .col(ColumnDef::new(Rental::InventoryId).big_integer().not_null())
            .col(ColumnDef::new(Rental::RentalDate).timestamp())
            .col(ColumnDef::new(Rental::ReturnDate).timestamp())
            .to_owned(),
        Table::create()
            .table(Inventory::Table)
            .if_not_exists()
            .col(ColumnDef::new(Inventory::InventoryId).big_integer().not_null())
            .col(ColumnDef::new(Inventory::FilmId).big_integer().not_null())
            .col(ColumnDef::new(Inventory::StoreId).big_integer().not_null())
            .to_owned(),
        Table::create()
            .table(Film::Table)
            .if_not_exists()
            .col(ColumnDef::new(Film::FilmId).big_integer().not_null())
            .col(ColumnDef::new(Film::Title).text().not_null())
            .col(ColumnDef::new(Film::RentalDuration).big_integer().not_null())
            .col(ColumnDef::new(Film::RentalRate).decimal_len(4, 2).not_null())
            .to_owned(),
        Table::create()
            .table(Category::Table)
            .if_not_exists()
            .col(ColumnDef::new(Category::CategoryId).big_integer().not_null())
            .col(ColumnDef::new(Category::Name).text().not_null())
            .to_owned(),
        Table::create()
            .table(FilmCategory::Table)
            .if_not_exists()
            .col(ColumnDef::new(FilmCategory::FilmId).big_integer().not_null())
            .col(ColumnDef::new(FilmCategory::CategoryId).big_integer().not_null())
            .to_owned(),
        Table::create()
            .table(Customer::Table)
            .if_not_exists()
            .col(ColumnDef::new(Customer::CustomerId).big_integer().not_null())
            .col(ColumnDef::new(Customer::FirstName).text().not_null())
            .col(ColumnDef::new(Customer::LastName).text().not_null())
            .col(ColumnDef::new(Customer::StoreId).big_integer().not_null())
            .to_owned(),
    ]
}

/// Indexes on the join keys the views follow.
pub fn base_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .if_not_exists()
            .name("idx_payment_rental")
            .table(Payment::Table)
            .col(Payment::RentalId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_payment_customer")
            .table(Payment::Table)
            .col(Payment::CustomerId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_rental_id")
            .table(Rental::Table)
            .col(Rental::RentalId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_rental_customer")
            .table(Rental::Table)
            .col(Rental::CustomerId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_film_category_film")
            .table(FilmCategory::Table)
            .col(FilmCategory::FilmId)
            .to_owned(),
    ]
}
