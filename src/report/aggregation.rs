//! Pure aggregations over a set of product transactions.
//!
//! Every function here takes the already filtered transactions and computes its
//! result in memory, so the report handlers can fetch a month of transactions
//! once and reuse it for every report.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::transaction::ProductTransaction;

/// Sale totals for a set of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of every transaction, sold or not, rounded to cents.
    pub total_sale_amount: f64,
    /// The number of transactions that have been sold.
    pub total_sold_items: u64,
    /// The number of transactions that have not been sold.
    pub total_not_sold_items: u64,
}

/// The number of transactions in one price range of the bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRangeCount {
    /// The label of the price range, e.g. "101-200".
    pub range: String,
    /// The number of transactions priced within the range.
    pub count: u64,
}

/// The number of transactions in one category of the pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category label.
    pub category: String,
    /// The number of transactions in the category.
    pub count: u64,
}

/// All three reports computed over the same set of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    /// See [compute_statistics].
    pub statistics: Statistics,
    /// See [compute_bar_chart].
    pub bar_chart: Vec<PriceRangeCount>,
    /// See [compute_pie_chart].
    pub pie_chart: Vec<CategoryCount>,
}

/// A bar chart bucket covering prices from its lower bound (only used for the
/// label) up to and including `max`.
struct PriceBucket {
    label: &'static str,
    max: f64,
}

/// The price buckets of the bar chart in ascending order.
///
/// A price belongs to the first bucket whose `max` it does not exceed, so
/// prices of exactly 100 are counted in "0-100" and prices of 101 in "101-200".
const PRICE_BUCKETS: [PriceBucket; 10] = [
    PriceBucket { label: "0-100", max: 100.0 },
    PriceBucket { label: "101-200", max: 200.0 },
    PriceBucket { label: "201-300", max: 300.0 },
    PriceBucket { label: "301-400", max: 400.0 },
    PriceBucket { label: "401-500", max: 500.0 },
    PriceBucket { label: "501-600", max: 600.0 },
    PriceBucket { label: "601-700", max: 700.0 },
    PriceBucket { label: "701-800", max: 800.0 },
    PriceBucket { label: "801-900", max: 900.0 },
    PriceBucket { label: "901-above", max: f64::INFINITY },
];

/// Computes the sale totals of `transactions`.
///
/// Note that `total_sale_amount` includes unsold transactions.
pub fn compute_statistics(transactions: &[ProductTransaction]) -> Statistics {
    let total_sale_amount: f64 = transactions.iter().map(|t| t.price).sum();
    let total_sold_items = transactions.iter().filter(|t| t.sold).count() as u64;

    Statistics {
        total_sale_amount: round_to_cents(total_sale_amount),
        total_sold_items,
        total_not_sold_items: transactions.len() as u64 - total_sold_items,
    }
}

/// Counts `transactions` per price range.
///
/// # Returns
/// One entry per price range in ascending price order, including empty ranges.
pub fn compute_bar_chart(transactions: &[ProductTransaction]) -> Vec<PriceRangeCount> {
    let mut counts = [0u64; PRICE_BUCKETS.len()];

    for transaction in transactions {
        let index = PRICE_BUCKETS
            .iter()
            .position(|bucket| transaction.price <= bucket.max)
            // NaN is not <= anything, count it with the most expensive bucket.
            .unwrap_or(PRICE_BUCKETS.len() - 1);
        counts[index] += 1;
    }

    PRICE_BUCKETS
        .iter()
        .zip(counts)
        .map(|(bucket, count)| PriceRangeCount {
            range: bucket.label.to_owned(),
            count,
        })
        .collect()
}

/// Counts `transactions` per category.
///
/// # Returns
/// One entry per distinct category in the order each category first appears
/// in `transactions`.
pub fn compute_pie_chart(transactions: &[ProductTransaction]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut index_by_category: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions {
        match index_by_category.get(transaction.category.as_str()) {
            Some(&index) => counts[index].count += 1,
            None => {
                index_by_category.insert(&transaction.category, counts.len());
                counts.push(CategoryCount {
                    category: transaction.category.clone(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Computes all three reports over the one set of `transactions`.
pub fn compute_combined_report(transactions: &[ProductTransaction]) -> CombinedReport {
    CombinedReport {
        statistics: compute_statistics(transactions),
        bar_chart: compute_bar_chart(transactions),
        pie_chart: compute_pie_chart(transactions),
    }
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
