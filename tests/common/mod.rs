//! Shared fixtures for integration tests.
//!
//! `sample_dataset` is a small, well-formed store with the awkward cases the
//! reports must handle: a film in two categories, a film with no category,
//! a payment whose rental is missing, an outstanding rental, a rental
//! returned before it was rented and a customer who never rented.

#![allow(dead_code)]

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use dvd_analytics::model::{
    parse_timestamp, Category, Customer, Dataset, Film, FilmCategory, InventoryItem, Payment,
    Rental,
};

pub fn ts(value: &str) -> NaiveDateTime {
    parse_timestamp(value).expect("valid timestamp")
}

pub fn money(value: &str) -> Decimal {
    value.parse().expect("valid decimal")
}

/// Evaluation instant used with `sample_dataset`; its 90-day cutoff is
/// 2005-06-03 00:00:00.
pub fn sample_as_of() -> NaiveDateTime {
    ts("2005-09-01 00:00:00")
}

fn payment(payment_id: i64, customer_id: i64, rental_id: i64, amount: &str, at: &str) -> Payment {
    Payment {
        payment_id,
        customer_id,
        rental_id,
        amount: Some(money(amount)),
        payment_date: ts(at),
    }
}

fn rental(
    rental_id: i64,
    customer_id: i64,
    inventory_id: i64,
    rented: &str,
    returned: Option<&str>,
) -> Rental {
    Rental {
        rental_id,
        customer_id,
        inventory_id,
        rental_date: Some(ts(rented)),
        return_date: returned.map(ts),
    }
}

fn customer(customer_id: i64, first_name: &str, last_name: &str, store_id: i64) -> Customer {
    Customer {
        customer_id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        store_id,
    }
}

fn film(film_id: i64, title: &str, rate: &str) -> Film {
    Film {
        film_id,
        title: title.to_string(),
        rental_duration: 6,
        rental_rate: money(rate),
    }
}

pub fn sample_dataset() -> Dataset {
    Dataset {
        payments: vec![
            payment(1, 1, 1001, "4.99", "2005-05-25 11:30:37"),
            payment(2, 1, 1002, "2.99", "2005-06-15 10:05:00"),
            // AGENT TRUMAN is in two categories
            payment(3, 2, 1003, "0.99", "2005-07-08 12:10:00"),
            payment(4, 3, 1004, "5.99", "2005-08-20 09:10:00"),
            // ALONE TRIP has no category
            payment(5, 3, 1005, "3.99", "2005-08-21 09:05:00"),
            // rental 9999 does not exist
            payment(6, 1, 9999, "1.99", "2005-08-01 14:00:00"),
        ],
        rentals: vec![
            rental(1001, 1, 100, "2005-05-24 22:53:30", Some("2005-05-26 22:04:30")),
            rental(1002, 1, 200, "2005-06-15 10:00:00", Some("2005-06-18 09:59:59")),
            rental(1003, 2, 300, "2005-07-08 12:00:00", Some("2005-07-10 12:00:00")),
            rental(1004, 3, 101, "2005-08-20 09:00:00", None),
            rental(1005, 3, 400, "2005-08-21 09:00:00", Some("2005-08-22 09:00:00")),
            rental(1006, 5, 200, "2005-05-01 08:00:00", Some("2005-04-30 20:30:00")),
        ],
        inventory: vec![
            InventoryItem {
                inventory_id: 100,
                film_id: 10,
                store_id: 1,
            },
            InventoryItem {
                inventory_id: 101,
                film_id: 10,
                store_id: 2,
            },
            InventoryItem {
                inventory_id: 200,
                film_id: 20,
                store_id: 1,
            },
            InventoryItem {
                inventory_id: 300,
                film_id: 30,
                store_id: 2,
            },
            InventoryItem {
                inventory_id: 400,
                film_id: 40,
                store_id: 1,
            },
        ],
        films: vec![
            film(10, "ACADEMY DINOSAUR", "0.99"),
            film(20, "AFRICAN EGG", "2.99"),
            film(30, "AGENT TRUMAN", "2.99"),
            film(40, "ALONE TRIP", "0.99"),
        ],
        categories: vec![
            Category {
                category_id: 1,
                name: "Action".into(),
            },
            Category {
                category_id: 2,
                name: "Comedy".into(),
            },
            Category {
                category_id: 3,
                name: "Documentary".into(),
            },
        ],
        film_categories: vec![
            FilmCategory {
                film_id: 10,
                category_id: 1,
            },
            FilmCategory {
                film_id: 20,
                category_id: 2,
            },
            FilmCategory {
                film_id: 30,
                category_id: 1,
            },
            FilmCategory {
                film_id: 30,
                category_id: 3,
            },
        ],
        customers: vec![
            customer(1, "MARY", "SMITH", 1),
            customer(2, "PATRICIA", "JOHNSON", 1),
            customer(3, "LINDA", "WILLIAMS", 2),
            customer(4, "BARBARA", "JONES", 2),
            customer(5, "ELIZABETH", "BROWN", 1),
        ],
    }
}

/// `sample_dataset` plus the defects the audits look for: a repeated
/// rental id, a rental without a date and a payment without an amount.
pub fn dirty_dataset() -> Dataset {
    let mut dataset = sample_dataset();
    dataset.rentals.push(rental(
        1003,
        2,
        300,
        "2005-07-08 12:00:00",
        Some("2005-07-10 12:00:00"),
    ));
    dataset.rentals.push(Rental {
        rental_id: 1007,
        customer_id: 4,
        inventory_id: 100,
        rental_date: None,
        return_date: None,
    });
    dataset.payments.push(Payment {
        payment_id: 7,
        customer_id: 2,
        rental_id: 1003,
        amount: None,
        payment_date: ts("2005-07-09 08:00:00"),
    });
    dataset
}

/// `sample_dataset` plus rentals whose timestamps carry milliseconds, one
/// per way a whole-second reading of the same pair would go wrong.
pub fn sub_second_dataset() -> Dataset {
    let mut dataset = sample_dataset();
    dataset.rentals.extend([
        // 59:59.2 apart
        rental(
            1101,
            5,
            100,
            "2005-08-01 10:00:00.900",
            Some("2005-08-01 11:00:00.100"),
        ),
        // 1:00:00.1 apart
        rental(
            1102,
            5,
            100,
            "2005-08-01 10:00:00.100",
            Some("2005-08-01 11:00:00.200"),
        ),
        // returned 59:59.2 before it was rented
        rental(
            1103,
            5,
            100,
            "2005-08-01 11:00:00.100",
            Some("2005-08-01 10:00:00.900"),
        ),
        rental(
            1104,
            5,
            100,
            "2005-08-01 10:00:00.250",
            Some("2005-08-01 12:00:00.250"),
        ),
    ]);
    dataset
}
