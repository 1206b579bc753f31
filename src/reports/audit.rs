//! Sanity and data-quality reports.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::{
    round_money, DuplicateRental, MissingValueAudit, RentalDurationAudit, TableRowCount,
};
use crate::model::{BaseTable, Dataset};
use crate::views::RentalCleanRow;

/// Row count of every base relation, in [`BaseTable::ALL`] order.
pub fn row_counts(dataset: &Dataset) -> Vec<TableRowCount> {
    BaseTable::ALL
        .iter()
        .map(|table| TableRowCount {
            table: table.as_str().to_string(),
            row_count: dataset.row_count(*table) as i64,
        })
        .collect()
}

/// Count nulls in `rental.rental_date`, `rental.return_date` and
/// `payment.amount`.
pub fn missing_values(dataset: &Dataset) -> MissingValueAudit {
    MissingValueAudit {
        missing_rental_date: dataset
            .rentals
            .iter()
            .filter(|r| r.rental_date.is_none())
            .count() as i64,
        missing_return_date: dataset
            .rentals
            .iter()
            .filter(|r| r.return_date.is_none())
            .count() as i64,
        missing_amount: dataset
            .payments
            .iter()
            .filter(|p| p.amount.is_none())
            .count() as i64,
    }
}

/// Rental identifiers that occur more than once, ordered by identifier.
///
/// Empty on well-formed data.
pub fn duplicate_rentals(dataset: &Dataset) -> Vec<DuplicateRental> {
    let mut occurrences: BTreeMap<i64, i64> = BTreeMap::new();
    for rental in &dataset.rentals {
        *occurrences.entry(rental.rental_id).or_insert(0) += 1;
    }

    occurrences
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(rental_id, occurrences)| DuplicateRental {
            rental_id,
            occurrences,
        })
        .collect()
}

/// Summarize rental durations: outstanding rentals, negative durations and
/// the mean duration of returned rentals.
pub fn rental_durations(rows: &[RentalCleanRow]) -> RentalDurationAudit {
    let hours: Vec<i64> = rows.iter().filter_map(|r| r.rental_hours).collect();

    let average_rental_hours = if hours.is_empty() {
        None
    } else {
        let total: i64 = hours.iter().sum();
        Some(round_money(
            Decimal::from(total) / Decimal::from(hours.len() as i64),
        ))
    };

    RentalDurationAudit {
        total_rentals: rows.len() as i64,
        outstanding_rentals: (rows.len() - hours.len()) as i64,
        negative_durations: hours.iter().filter(|h| **h < 0).count() as i64,
        average_rental_hours,
    }
}
