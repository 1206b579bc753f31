//! Customer lifetime value and churn.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;

use super::{round_money, CustomerLifetimeValue, InactiveCustomer};
use crate::model::Dataset;
use crate::views::PaymentAnalysisRow;

/// Customer grouping key: identifier plus name, as the SQL groups it.
type CustomerKey<'a> = (i64, &'a str, &'a str);

/// Highest-spending customers, capped at `limit`.
///
/// Ordered by rounded spend descending; equal spend falls back to
/// `customer_id` ascending.
pub fn top_customers(rows: &[PaymentAnalysisRow], limit: usize) -> Vec<CustomerLifetimeValue> {
    let mut totals: HashMap<CustomerKey<'_>, (Decimal, i64)> = HashMap::new();
    for row in rows {
        let key = (row.customer_id, row.first_name.as_str(), row.last_name.as_str());
        let (total, payments) = totals.entry(key).or_default();
        if let Some(amount) = row.payment_amount {
            *total += amount;
        }
        *payments += 1;
    }

    let mut report: Vec<CustomerLifetimeValue> = totals
        .into_iter()
        .map(
            |((customer_id, first_name, last_name), (total, payment_count))| {
                CustomerLifetimeValue {
                    customer_id,
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                    total_spent: round_money(total),
                    payment_count,
                }
            },
        )
        .collect();

    report.sort_by(|a, b| {
        b.total_spent
            .cmp(&a.total_spent)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
            .then_with(|| a.last_name.cmp(&b.last_name))
            .then_with(|| a.first_name.cmp(&b.first_name))
    });
    report.truncate(limit);
    report
}

/// Instant before which a last rental counts as churned.
pub fn churn_cutoff(as_of: NaiveDateTime, window_days: i64) -> NaiveDateTime {
    as_of - Duration::days(window_days)
}

/// Customers whose most recent rental is strictly before `cutoff`, plus
/// customers who never rented.
///
/// Customers left-join rentals, so a customer with no rental rows still
/// appears with `last_rental_date == None`. Ordered by last rental
/// ascending with never-rented customers first, then `customer_id`.
pub fn inactive_customers(dataset: &Dataset, cutoff: NaiveDateTime) -> Vec<InactiveCustomer> {
    let mut last_rental: HashMap<i64, NaiveDateTime> = HashMap::new();
    for rental in &dataset.rentals {
        let Some(rented_at) = rental.rental_date else {
            continue;
        };
        last_rental
            .entry(rental.customer_id)
            .and_modify(|latest| {
                if rented_at > *latest {
                    *latest = rented_at;
                }
            })
            .or_insert(rented_at);
    }

    let customers: BTreeMap<CustomerKey<'_>, Option<NaiveDateTime>> = dataset
        .customers
        .iter()
        .map(|c| {
            (
                (c.customer_id, c.first_name.as_str(), c.last_name.as_str()),
                last_rental.get(&c.customer_id).copied(),
            )
        })
        .collect();

    let mut report: Vec<InactiveCustomer> = customers
        .into_iter()
        .filter(|(_, last)| match last {
            Some(last) => *last < cutoff,
            None => true,
        })
        .map(
            |((customer_id, first_name, last_name), last_rental_date)| InactiveCustomer {
                customer_id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                last_rental_date,
            },
        )
        .collect();

    report.sort_by(|a, b| {
        a.last_rental_date
            .cmp(&b.last_rental_date)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    });
    report
}
