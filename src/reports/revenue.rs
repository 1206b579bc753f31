//! Revenue reports over the payment analysis relation.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::{round_money, CategoryRevenue, MonthlyRevenue, StorePerformance};
use crate::views::PaymentAnalysisRow;

/// `YYYY-MM` bucket of a payment timestamp.
pub fn month_key(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m").to_string()
}

/// Revenue per category, highest first; ties by category name.
pub fn revenue_by_category(rows: &[PaymentAnalysisRow]) -> Vec<CategoryRevenue> {
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for row in rows {
        let total = totals.entry(row.category.as_str()).or_default();
        if let Some(amount) = row.payment_amount {
            *total += amount;
        }
    }

    let mut report: Vec<CategoryRevenue> = totals
        .into_iter()
        .map(|(category, total)| CategoryRevenue {
            category: category.to_string(),
            revenue: round_money(total),
        })
        .collect();

    report.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.category.cmp(&b.category))
    });
    report
}

/// Revenue per calendar month, oldest first.
pub fn monthly_revenue(rows: &[PaymentAnalysisRow]) -> Vec<MonthlyRevenue> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for row in rows {
        let total = totals.entry(month_key(&row.payment_date)).or_default();
        if let Some(amount) = row.payment_amount {
            *total += amount;
        }
    }

    totals
        .into_iter()
        .map(|(month, total)| MonthlyRevenue {
            month,
            revenue: round_money(total),
        })
        .collect()
}

/// Revenue and distinct paying customers per store, highest revenue first.
pub fn store_performance(rows: &[PaymentAnalysisRow]) -> Vec<StorePerformance> {
    let mut stores: HashMap<i64, (Decimal, HashSet<i64>)> = HashMap::new();
    for row in rows {
        let (total, customers) = stores.entry(row.store_id).or_default();
        if let Some(amount) = row.payment_amount {
            *total += amount;
        }
        customers.insert(row.customer_id);
    }

    let mut report: Vec<StorePerformance> = stores
        .into_iter()
        .map(|(store_id, (total, customers))| StorePerformance {
            store_id,
            revenue: round_money(total),
            customers: customers.len() as i64,
        })
        .collect();

    report.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.store_id.cmp(&b.store_id))
    });
    report
}
