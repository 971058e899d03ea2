//! The route handler for listing product transactions one page at a time.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    pagination::{Page, PaginationConfig, empty_string_as_none},
};

use super::{
    core::ProductTransaction,
    query::{TransactionFilter, query_transactions},
};

/// The state needed to list product transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls the default and maximum page sizes.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters accepted by [list_transactions_endpoint].
///
/// Empty values, e.g. `month=&page=`, are treated as missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    /// The month number (1-12) to filter by.
    ///
    /// Kept as text so that an invalid month gets the same error response as
    /// an out of range one.
    pub month: Option<String>,
    /// Text to look for in the title, description or price.
    pub search: Option<String>,
    /// The 1-based page number.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u64>,
    /// The number of transactions per page.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub per_page: Option<u64>,
}

/// A route handler that returns one page of product transactions as JSON,
/// optionally filtered by sale month and search text.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<Vec<ProductTransaction>>, Error> {
    let filter = TransactionFilter::from_request(query.month.as_deref(), query.search.as_deref())?;
    let page = Page::from_request(query.page, query.per_page, &state.pagination_config);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = query_transactions(&filter, Some(page), &connection)
        .inspect_err(|error| tracing::error!("could not query transactions: {error}"))?;

    Ok(Json(transactions))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        db::initialize,
        endpoints,
        pagination::PaginationConfig,
        transaction::{ProductTransaction, create_transaction},
    };

    use super::{ListTransactionsState, list_transactions_endpoint};

    fn get_test_state() -> ListTransactionsState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        ListTransactionsState {
            db_connection: Arc::new(Mutex::new(connection)),
            pagination_config: PaginationConfig {
                default_page_size: 2,
                max_page_size: 3,
            },
        }
    }

    fn get_test_server(state: ListTransactionsState) -> TestServer {
        let app = Router::new()
            .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn insert_fixtures(state: &ListTransactionsState) -> Vec<ProductTransaction> {
        let connection = state.db_connection.lock().unwrap();
        [
            ("Backpack", 109.95, datetime!(2021-03-27 20:29:54 UTC)),
            ("Cotton Jacket", 55.99, datetime!(2021-10-27 20:29:54 UTC)),
            ("Slim Fit T-Shirt", 22.3, datetime!(2022-03-27 20:29:54 UTC)),
            ("Gold Chain Bracelet", 695.0, datetime!(2022-03-02 08:00:00 UTC)),
        ]
        .into_iter()
        .map(|(title, price, date)| {
            create_transaction(ProductTransaction::build(title, price, date), &connection)
                .unwrap()
        })
        .collect()
    }

    #[tokio::test]
    async fn uses_default_page_size() {
        let state = get_test_state();
        let want = insert_fixtures(&state);
        let server = get_test_server(state);

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<ProductTransaction>>(), want[..2]);
    }

    #[tokio::test]
    async fn returns_requested_page() {
        let state = get_test_state();
        let want = insert_fixtures(&state);
        let server = get_test_server(state);

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("page", 2)
            .add_query_param("perPage", 3)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<ProductTransaction>>(), want[3..]);
    }

    #[tokio::test]
    async fn filters_by_month_and_search() {
        let state = get_test_state();
        let want = insert_fixtures(&state);
        let server = get_test_server(state);

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("month", 3)
            .add_query_param("search", "SHIRT")
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<ProductTransaction>>(), vec![want[2].clone()]);
    }

    #[tokio::test]
    async fn rejects_invalid_month() {
        let server = get_test_server(get_test_state());

        for month in ["13", "-1", "300", "abc"] {
            let response = server
                .get(endpoints::TRANSACTIONS)
                .add_query_param("month", month)
                .expect_failure()
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json(&json!({
                "error": format!("\"{month}\" is not a valid month, expected a number between 1 and 12")
            }));
        }
    }

    #[tokio::test]
    async fn empty_params_are_ignored() {
        let state = get_test_state();
        let want = insert_fixtures(&state);
        let server = get_test_server(state);

        let response = server
            .get(&format!(
                "{}?month=&search=&page=1&perPage=10",
                endpoints::TRANSACTIONS
            ))
            .await;

        response.assert_status_ok();
        // perPage=10 is clamped to the maximum of 3.
        assert_eq!(response.json::<Vec<ProductTransaction>>(), want[..3]);
    }

    #[tokio::test]
    async fn empty_page_params_use_defaults() {
        let state = get_test_state();
        let want = insert_fixtures(&state);
        let server = get_test_server(state);

        let response = server
            .get(&format!("{}?page=&perPage=", endpoints::TRANSACTIONS))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<ProductTransaction>>(), want[..2]);
    }

    #[tokio::test]
    async fn rejects_negative_page() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("page", -1)
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
