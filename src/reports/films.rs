//! Film popularity.

use std::collections::HashMap;

use super::FilmRentalCount;
use crate::views::PaymentAnalysisRow;

/// Most frequently rented titles, capped at `limit`.
///
/// Counts payment analysis rows per title, so unpaid rentals are not
/// counted. Ties fall back to title ascending.
pub fn most_rented_films(rows: &[PaymentAnalysisRow], limit: usize) -> Vec<FilmRentalCount> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for row in rows {
        *counts.entry(row.film_title.as_str()).or_insert(0) += 1;
    }

    let mut report: Vec<FilmRentalCount> = counts
        .into_iter()
        .map(|(title, rental_count)| FilmRentalCount {
            film_title: title.to_string(),
            rental_count,
        })
        .collect();

    report.sort_by(|a, b| {
        b.rental_count
            .cmp(&a.rental_count)
            .then_with(|| a.film_title.cmp(&b.film_title))
    });
    report.truncate(limit);
    report
}
