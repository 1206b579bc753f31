//! Normalization layer.
//!
//! Two derived relations, recomputed on every read:
//! - [`payment_analysis`]: one denormalized row per payment whose whole join
//!   chain resolves (inner-join semantics, unresolvable payments drop out).
//! - [`rental_clean`]: one row per rental with elapsed whole hours.
//!
//! The SQL backends define the same relations as database views; see
//! [`crate::storage::sql`].

use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::Dataset;

/// Row of the `payment_analysis` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAnalysisRow {
    pub payment_id: i64,
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    /// The customer's home store.
    pub store_id: i64,
    pub payment_amount: Option<Decimal>,
    pub payment_date: NaiveDateTime,
    pub category: String,
    pub film_title: String,
    pub rental_date: Option<NaiveDateTime>,
    pub return_date: Option<NaiveDateTime>,
}

/// Row of the `rental_clean` view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalCleanRow {
    pub rental_id: i64,
    pub customer_id: i64,
    pub inventory_id: i64,
    pub rental_date: Option<NaiveDateTime>,
    pub return_date: Option<NaiveDateTime>,
    /// Whole hours between rental and return, truncated toward zero.
    /// `None` while the rental is outstanding. Negative values are kept.
    pub rental_hours: Option<i64>,
}

/// Group references to `items` by `key`, keeping every match so joins
/// fan out the way a relational inner join does.
fn index_by<T, K, F>(items: &[T], key: F) -> HashMap<K, Vec<&T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, Vec<&T>> = HashMap::with_capacity(items.len());
    for item in items {
        index.entry(key(item)).or_default().push(item);
    }
    index
}

/// Build the payment analysis relation.
///
/// Joins payment → rental → inventory → film → film_category → category and
/// payment → customer. Output is ordered by `payment_id`, then category.
pub fn payment_analysis(dataset: &Dataset) -> Vec<PaymentAnalysisRow> {
    let rentals = index_by(&dataset.rentals, |r| r.rental_id);
    let inventory = index_by(&dataset.inventory, |i| i.inventory_id);
    let films = index_by(&dataset.films, |f| f.film_id);
    let film_categories = index_by(&dataset.film_categories, |fc| fc.film_id);
    let categories = index_by(&dataset.categories, |c| c.category_id);
    let customers = index_by(&dataset.customers, |c| c.customer_id);

    let mut rows = Vec::new();

    for payment in &dataset.payments {
        let Some(payment_customers) = customers.get(&payment.customer_id) else {
            continue;
        };
        let Some(payment_rentals) = rentals.get(&payment.rental_id) else {
            continue;
        };

        for rental in payment_rentals {
            let Some(items) = inventory.get(&rental.inventory_id) else {
                continue;
            };
            for item in items {
                let Some(item_films) = films.get(&item.film_id) else {
                    continue;
                };
                for film in item_films {
                    let Some(links) = film_categories.get(&film.film_id) else {
                        continue;
                    };
                    for link in links {
                        let Some(link_categories) = categories.get(&link.category_id) else {
                            continue;
                        };
                        for category in link_categories {
                            for customer in payment_customers {
                                rows.push(PaymentAnalysisRow {
                                    payment_id: payment.payment_id,
                                    customer_id: payment.customer_id,
                                    first_name: customer.first_name.clone(),
                                    last_name: customer.last_name.clone(),
                                    store_id: customer.store_id,
                                    payment_amount: payment.amount,
                                    payment_date: payment.payment_date,
                                    category: category.name.clone(),
                                    film_title: film.title.clone(),
                                    rental_date: rental.rental_date,
                                    return_date: rental.return_date,
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    rows.sort_by(|a, b| {
        a.payment_id
            .cmp(&b.payment_id)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

/// Whole hours elapsed between two timestamps, truncated toward zero.
pub fn elapsed_hours(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_hours()
}

/// Build the rental clean relation, ordered by `rental_id`.
pub fn rental_clean(dataset: &Dataset) -> Vec<RentalCleanRow> {
    let mut rows: Vec<RentalCleanRow> = dataset
        .rentals
        .iter()
        .map(|rental| RentalCleanRow {
            rental_id: rental.rental_id,
            customer_id: rental.customer_id,
            inventory_id: rental.inventory_id,
            rental_date: rental.rental_date,
            return_date: rental.return_date,
            rental_hours: match (rental.rental_date, rental.return_date) {
                (Some(from), Some(to)) => Some(elapsed_hours(from, to)),
                _ => None,
            },
        })
        .collect();

    rows.sort_by_key(|row| row.rental_id);
    rows
}
