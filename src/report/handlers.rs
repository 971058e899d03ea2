//! Report HTTP handlers.
//!
//! Each handler fetches the transactions sold in the requested month once and
//! hands them to the pure functions in [super::aggregation].

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    report::aggregation::{
        CategoryCount, CombinedReport, PriceRangeCount, Statistics, compute_bar_chart,
        compute_combined_report, compute_pie_chart, compute_statistics,
    },
    transaction::{ProductTransaction, TransactionFilter, parse_month, query_transactions},
};

/// The state needed for computing reports.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the report handlers.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The month number (1-12) to report on. Required.
    ///
    /// Kept as text so that an invalid month gets the same error response as
    /// an out of range one.
    pub month: Option<String>,
}

/// Get the sale totals for the requested month.
pub async fn get_statistics(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Statistics>, Error> {
    let transactions = get_transactions_for_month(&state, &query)?;

    Ok(Json(compute_statistics(&transactions)))
}

/// Get the number of transactions per price range for the requested month.
pub async fn get_bar_chart(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<PriceRangeCount>>, Error> {
    let transactions = get_transactions_for_month(&state, &query)?;

    Ok(Json(compute_bar_chart(&transactions)))
}

/// Get the number of transactions per category for the requested month.
pub async fn get_pie_chart(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, Error> {
    let transactions = get_transactions_for_month(&state, &query)?;

    Ok(Json(compute_pie_chart(&transactions)))
}

/// Get the statistics, bar chart and pie chart for the requested month in one
/// response, all computed from a single query.
pub async fn get_combined_report(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CombinedReport>, Error> {
    let transactions = get_transactions_for_month(&state, &query)?;

    Ok(Json(compute_combined_report(&transactions)))
}

fn get_transactions_for_month(
    state: &ReportState,
    query: &MonthQuery,
) -> Result<Vec<ProductTransaction>, Error> {
    let month = match query.month.as_deref() {
        Some(month) if !month.trim().is_empty() => parse_month(month)?,
        _ => return Err(Error::MissingMonth),
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    query_transactions(&TransactionFilter::for_month(month), None, &connection).inspect_err(
        |error| tracing::error!("could not get transactions for month {month}: {error}"),
    )
}
