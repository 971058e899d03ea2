//! Monthly sales reports.
//!
//! Provides sale totals, a price range bar chart and a category pie chart for
//! the transactions sold in a given month, separately or combined.

mod aggregation;
mod handlers;

pub use handlers::{get_bar_chart, get_combined_report, get_pie_chart, get_statistics};
