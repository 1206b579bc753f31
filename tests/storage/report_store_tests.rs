//! ReportStore interface tests.
//!
//! These tests verify the contract of the ReportStore trait against the
//! `sample_dataset` fixture. Each storage implementation should run these
//! tests.

use dvd_analytics::interfaces::ReportStore;

use crate::common::{money, sample_as_of, ts};

// =============================================================================
// Views
// =============================================================================

pub async fn test_install_views_is_idempotent<S: ReportStore + ?Sized>(store: &S) {
    store.install_views().await.expect("first install");
    store.install_views().await.expect("second install");
}

pub async fn test_payment_analysis_join_closure<S: ReportStore + ?Sized>(store: &S) {
    let rows = store.payment_analysis().await.expect("payment_analysis");

    let keys: Vec<(i64, &str)> = rows
        .iter()
        .map(|r| (r.payment_id, r.category.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (1, "Action"),
            (2, "Comedy"),
            (3, "Action"),
            (3, "Documentary"),
            (4, "Action"),
        ],
        "broken chains drop the payment, multi-category films fan out"
    );

    let first = &rows[0];
    assert_eq!(first.customer_id, 1);
    assert_eq!(first.first_name, "MARY");
    assert_eq!(first.last_name, "SMITH");
    assert_eq!(first.store_id, 1);
    assert_eq!(first.payment_amount, Some(money("4.99")));
    assert_eq!(first.payment_date, ts("2005-05-25 11:30:37"));
    assert_eq!(first.film_title, "ACADEMY DINOSAUR");
    assert_eq!(first.rental_date, Some(ts("2005-05-24 22:53:30")));
    assert_eq!(first.return_date, Some(ts("2005-05-26 22:04:30")));

    // store_id is the customer's store, not the inventory's
    let linda = rows.iter().find(|r| r.payment_id == 4).expect("payment 4");
    assert_eq!(linda.store_id, 2);
    assert_eq!(linda.return_date, None);
}

pub async fn test_rental_clean_hours<S: ReportStore + ?Sized>(store: &S) {
    let rows = store.rental_clean().await.expect("rental_clean");

    let hours: Vec<(i64, Option<i64>)> = rows.iter().map(|r| (r.rental_id, r.rental_hours)).collect();
    assert_eq!(
        hours,
        vec![
            (1001, Some(47)),
            (1002, Some(71)),
            (1003, Some(48)),
            (1004, None),
            (1005, Some(24)),
            (1006, Some(-11)),
        ]
    );
}

// =============================================================================
// Audits
// =============================================================================

pub async fn test_row_counts<S: ReportStore + ?Sized>(store: &S) {
    let counts = store.row_counts().await.expect("row_counts");

    let counts: Vec<(&str, i64)> = counts
        .iter()
        .map(|c| (c.table.as_str(), c.row_count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("payment", 6),
            ("rental", 6),
            ("inventory", 5),
            ("film", 4),
            ("category", 3),
            ("film_category", 4),
            ("customer", 5),
        ]
    );
}

pub async fn test_missing_values<S: ReportStore + ?Sized>(store: &S) {
    let audit = store.missing_values().await.expect("missing_values");

    assert_eq!(audit.missing_rental_date, 0);
    assert_eq!(audit.missing_return_date, 1);
    assert_eq!(audit.missing_amount, 0);
}

pub async fn test_no_duplicate_rentals<S: ReportStore + ?Sized>(store: &S) {
    let duplicates = store.duplicate_rentals().await.expect("duplicate_rentals");
    assert!(duplicates.is_empty(), "well-formed data has no duplicates");
}

pub async fn test_rental_durations<S: ReportStore + ?Sized>(store: &S) {
    let audit = store.rental_durations().await.expect("rental_durations");

    assert_eq!(audit.total_rentals, 6);
    assert_eq!(audit.outstanding_rentals, 1);
    assert_eq!(audit.negative_durations, 1);
    // (47 + 71 + 48 + 24 - 11) / 5
    assert_eq!(audit.average_rental_hours, Some(money("35.80")));
}

// =============================================================================
// Revenue
// =============================================================================

pub async fn test_revenue_by_category<S: ReportStore + ?Sized>(store: &S) {
    let report = store.revenue_by_category().await.expect("revenue_by_category");

    let report: Vec<(&str, _)> = report
        .iter()
        .map(|r| (r.category.as_str(), r.revenue))
        .collect();
    assert_eq!(
        report,
        vec![
            ("Action", money("11.97")),
            ("Comedy", money("2.99")),
            ("Documentary", money("0.99")),
        ]
    );
}

pub async fn test_monthly_revenue<S: ReportStore + ?Sized>(store: &S) {
    let report = store.monthly_revenue().await.expect("monthly_revenue");

    let report: Vec<(&str, _)> = report
        .iter()
        .map(|r| (r.month.as_str(), r.revenue))
        .collect();
    assert_eq!(
        report,
        vec![
            ("2005-05", money("4.99")),
            ("2005-06", money("2.99")),
            ("2005-07", money("1.98")),
            ("2005-08", money("5.99")),
        ]
    );
}

pub async fn test_store_performance<S: ReportStore + ?Sized>(store: &S) {
    let report = store.store_performance().await.expect("store_performance");

    let report: Vec<(i64, _, i64)> = report
        .iter()
        .map(|r| (r.store_id, r.revenue, r.customers))
        .collect();
    assert_eq!(
        report,
        vec![(1, money("9.96"), 2), (2, money("5.99"), 1)]
    );
}

pub async fn test_revenue_conservation<S: ReportStore + ?Sized>(store: &S) {
    let by_category: rust_decimal::Decimal = store
        .revenue_by_category()
        .await
        .expect("revenue_by_category")
        .iter()
        .map(|r| r.revenue)
        .sum();
    let by_month: rust_decimal::Decimal = store
        .monthly_revenue()
        .await
        .expect("monthly_revenue")
        .iter()
        .map(|r| r.revenue)
        .sum();
    let by_store: rust_decimal::Decimal = store
        .store_performance()
        .await
        .expect("store_performance")
        .iter()
        .map(|r| r.revenue)
        .sum();

    assert_eq!(by_category, money("15.95"));
    assert_eq!(by_month, by_category);
    assert_eq!(by_store, by_category);
}

// =============================================================================
// Customers and films
// =============================================================================

pub async fn test_top_customers<S: ReportStore + ?Sized>(store: &S) {
    let report = store.top_customers(10).await.expect("top_customers");

    let report: Vec<(i64, _, i64)> = report
        .iter()
        .map(|r| (r.customer_id, r.total_spent, r.payment_count))
        .collect();
    assert_eq!(
        report,
        vec![
            (1, money("7.98"), 2),
            (3, money("5.99"), 1),
            (2, money("1.98"), 2),
        ]
    );
}

pub async fn test_top_customers_limit<S: ReportStore + ?Sized>(store: &S) {
    let report = store.top_customers(2).await.expect("top_customers");

    assert_eq!(report.len(), 2);
    assert_eq!(report[0].first_name, "MARY");
    assert!(report[0].total_spent >= report[1].total_spent);

    let none = store.top_customers(0).await.expect("top_customers");
    assert!(none.is_empty());
}

pub async fn test_most_rented_films<S: ReportStore + ?Sized>(store: &S) {
    let report = store.most_rented_films(10).await.expect("most_rented_films");

    let report: Vec<(&str, i64)> = report
        .iter()
        .map(|r| (r.film_title.as_str(), r.rental_count))
        .collect();
    assert_eq!(
        report,
        vec![
            ("ACADEMY DINOSAUR", 2),
            ("AGENT TRUMAN", 2),
            ("AFRICAN EGG", 1),
        ]
    );
}

pub async fn test_inactive_customers<S: ReportStore + ?Sized>(store: &S) {
    let cutoff = dvd_analytics::reports::churn_cutoff(sample_as_of(), 90);
    assert_eq!(cutoff, ts("2005-06-03 00:00:00"));

    let report = store
        .inactive_customers(cutoff)
        .await
        .expect("inactive_customers");

    let report: Vec<(i64, Option<_>)> = report
        .iter()
        .map(|r| (r.customer_id, r.last_rental_date))
        .collect();
    assert_eq!(
        report,
        vec![(4, None), (5, Some(ts("2005-05-01 08:00:00")))],
        "never-rented customers first, then oldest last rental"
    );
}

pub async fn test_inactive_customers_boundary<S: ReportStore + ?Sized>(store: &S) {
    // ELIZABETH's only rental is exactly at the cutoff: not strictly before
    let at = ts("2005-05-01 08:00:00");
    let report = store.inactive_customers(at).await.expect("inactive_customers");
    assert!(report.iter().all(|r| r.customer_id != 5));

    let after = ts("2005-05-01 08:00:01");
    let report = store
        .inactive_customers(after)
        .await
        .expect("inactive_customers");
    assert!(report.iter().any(|r| r.customer_id == 5));
}

// =============================================================================
// Dirty data
// =============================================================================

/// Audits over `dirty_dataset`. Run against a store seeded with it.
pub async fn test_audits_on_dirty_data<S: ReportStore + ?Sized>(store: &S) {
    let missing = store.missing_values().await.expect("missing_values");
    assert_eq!(missing.missing_rental_date, 1);
    assert_eq!(missing.missing_return_date, 2);
    assert_eq!(missing.missing_amount, 1);

    let duplicates = store.duplicate_rentals().await.expect("duplicate_rentals");
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].rental_id, 1003);
    assert_eq!(duplicates[0].occurrences, 2);

    // a null amount contributes nothing to revenue
    let revenue = store.revenue_by_category().await.expect("revenue_by_category");
    let documentary = revenue
        .iter()
        .find(|r| r.category == "Documentary")
        .expect("Documentary");
    // payment 3 now joins rental 1003 twice
    assert_eq!(documentary.revenue, money("1.98"));

    let durations = store.rental_durations().await.expect("rental_durations");
    assert_eq!(durations.total_rentals, 8);
    assert_eq!(durations.outstanding_rentals, 2);
}

// =============================================================================
// Sub-second timestamps
// =============================================================================

/// Elapsed hours over `sub_second_dataset`. Run against a store seeded with it.
pub async fn test_rental_hours_keep_milliseconds<S: ReportStore + ?Sized>(store: &S) {
    store.install_views().await.expect("install views");

    let rows = store.rental_clean().await.expect("rental_clean");
    let hours = |rental_id: i64| {
        rows.iter()
            .find(|r| r.rental_id == rental_id)
            .unwrap_or_else(|| panic!("rental {rental_id}"))
            .rental_hours
    };

    assert_eq!(hours(1101), Some(0));
    assert_eq!(hours(1102), Some(1));
    assert_eq!(hours(1103), Some(0));
    assert_eq!(hours(1104), Some(2));

    let returned = rows
        .iter()
        .find(|r| r.rental_id == 1101)
        .and_then(|r| r.return_date)
        .expect("return date");
    assert_eq!(returned, ts("2005-08-01 11:00:00.100"));
}

// =============================================================================
// Test runner macro
// =============================================================================

/// Run all ReportStore interface tests against a store seeded with
/// `common::sample_dataset`.
#[macro_export]
macro_rules! run_report_store_tests {
    ($store:expr) => {
        use $crate::storage::report_store_tests::*;

        // views
        test_install_views_is_idempotent($store).await;
        println!("  test_install_views_is_idempotent: PASSED");

        test_payment_analysis_join_closure($store).await;
        println!("  test_payment_analysis_join_closure: PASSED");

        test_rental_clean_hours($store).await;
        println!("  test_rental_clean_hours: PASSED");

        // audits
        test_row_counts($store).await;
        println!("  test_row_counts: PASSED");

        test_missing_values($store).await;
        println!("  test_missing_values: PASSED");

        test_no_duplicate_rentals($store).await;
        println!("  test_no_duplicate_rentals: PASSED");

        test_rental_durations($store).await;
        println!("  test_rental_durations: PASSED");

        // revenue
        test_revenue_by_category($store).await;
        println!("  test_revenue_by_category: PASSED");

        test_monthly_revenue($store).await;
        println!("  test_monthly_revenue: PASSED");

        test_store_performance($store).await;
        println!("  test_store_performance: PASSED");

        test_revenue_conservation($store).await;
        println!("  test_revenue_conservation: PASSED");

        // customers and films
        test_top_customers($store).await;
        println!("  test_top_customers: PASSED");

        test_top_customers_limit($store).await;
        println!("  test_top_customers_limit: PASSED");

        test_most_rented_films($store).await;
        println!("  test_most_rented_films: PASSED");

        test_inactive_customers($store).await;
        println!("  test_inactive_customers: PASSED");

        test_inactive_customers_boundary($store).await;
        println!("  test_inactive_customers_boundary: PASSED");
    };
}
