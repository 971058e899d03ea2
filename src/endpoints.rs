//! The API endpoints URIs.

/// The route for loading the seed data into the database.
pub const INIT: &str = "/api/init";
/// The route for listing, searching and paging product transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the sale totals of a month.
pub const STATISTICS: &str = "/api/statistics";
/// The route for the number of transactions per price range in a month.
pub const BAR_CHART: &str = "/api/barchart";
/// The route for the number of transactions per category in a month.
pub const PIE_CHART: &str = "/api/piechart";
/// The route for the statistics, bar chart and pie chart of a month in one response.
pub const COMBINED: &str = "/api/combined";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::INIT);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::STATISTICS);
        assert_endpoint_is_valid_uri(endpoints::BAR_CHART);
        assert_endpoint_is_valid_uri(endpoints::PIE_CHART);
        assert_endpoint_is_valid_uri(endpoints::COMBINED);
    }
}
