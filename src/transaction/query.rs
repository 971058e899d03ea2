//! Filters and database queries for listing product transactions.

use rusqlite::{Connection, named_params};
use time::Month;

use crate::{Error, pagination::Page};

use super::core::{ProductTransaction, map_transaction_row};

/// Which product transactions a query should return.
///
/// Build one with [TransactionFilter::from_request] or [TransactionFilter::for_month]
/// and pass it to [query_transactions].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only include transactions sold in this calendar month, in any year.
    pub month: Option<Month>,
    /// Only include transactions whose title, description or price (as text)
    /// contain this text, ignoring case.
    pub search: Option<String>,
}

impl TransactionFilter {
    /// A filter that matches every transaction sold in `month`, in any year.
    pub fn for_month(month: Month) -> Self {
        Self {
            month: Some(month),
            search: None,
        }
    }

    /// Build a filter from the raw request parameters.
    ///
    /// A blank `month` or `search` string does not filter anything.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `month` is not a number between 1 and 12.
    pub fn from_request(month: Option<&str>, search: Option<&str>) -> Result<Self, Error> {
        let month = month
            .filter(|month| !month.trim().is_empty())
            .map(parse_month)
            .transpose()?;
        let search = search
            .filter(|search| !search.trim().is_empty())
            .map(ToOwned::to_owned);

        Ok(Self { month, search })
    }
}

/// Parse a month number between 1 and 12 (e.g. "3" or "03") into a [Month].
///
/// # Errors
/// Returns [Error::InvalidMonth] if `month` is not a number between 1 and 12.
pub fn parse_month(month: &str) -> Result<Month, Error> {
    month
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(|number| Month::try_from(number).ok())
        .ok_or_else(|| Error::InvalidMonth(month.to_owned()))
}

/// Get the transactions matching `filter` in ascending ID order.
///
/// If `page` is `None` every matching transaction is returned.
///
/// # Errors
/// Returns [Error::Query] if the query fails or a row cannot be mapped.
pub fn query_transactions(
    filter: &TransactionFilter,
    page: Option<Page>,
    connection: &Connection,
) -> Result<Vec<ProductTransaction>, Error> {
    // SQLite treats a negative limit as no limit.
    let (limit, offset) = match page {
        Some(page) => (to_sql_int(page.size), to_sql_int(page.offset())),
        None => (-1, 0),
    };

    connection
        .prepare(
            "SELECT id, title, description, price, category, date_of_sale, sold
            FROM product_transaction
            WHERE (:month IS NULL OR CAST(strftime('%m', date_of_sale) AS INTEGER) = :month)
            AND (:search IS NULL
                OR contains_text(title, :search)
                OR contains_text(description, :search)
                OR contains_text(price_text(price), :search))
            ORDER BY id ASC
            LIMIT :limit OFFSET :offset",
        )?
        .query_map(
            named_params! {
                ":month": filter.month.map(u8::from),
                ":search": filter.search.as_deref(),
                ":limit": limit,
                ":offset": offset,
            },
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::Query))
        .collect()
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Month, OffsetDateTime, macros::datetime};

    use crate::{
        Error,
        db::initialize,
        pagination::Page,
        transaction::{ProductTransaction, create_transaction},
    };

    use super::{TransactionFilter, parse_month, query_transactions};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn insert(
        title: &str,
        description: &str,
        price: f64,
        date_of_sale: OffsetDateTime,
        conn: &Connection,
    ) -> ProductTransaction {
        create_transaction(
            ProductTransaction::build(title, price, date_of_sale).description(description),
            conn,
        )
        .expect("Could not create transaction")
    }

    #[test]
    fn month_filter_ignores_year() {
        let conn = get_test_connection();
        let march_2021 = insert("a", "", 1.0, datetime!(2021-03-01 00:00:00 UTC), &conn);
        insert("b", "", 1.0, datetime!(2022-04-15 00:00:00 UTC), &conn);
        let march_2022 = insert("c", "", 1.0, datetime!(2022-03-31 23:59:59 UTC), &conn);

        let got =
            query_transactions(&TransactionFilter::for_month(Month::March), None, &conn).unwrap();

        assert_eq!(got, vec![march_2021, march_2022]);
    }

    #[test]
    fn month_filter_returns_only_matching_month_for_every_month() {
        let conn = get_test_connection();
        for year in [2021, 2022] {
            for month in 1..=12u8 {
                let date_of_sale = time::Date::from_calendar_date(year, Month::try_from(month).unwrap(), 10)
                    .unwrap()
                    .midnight()
                    .assume_utc();
                insert("", "", month as f64, date_of_sale, &conn);
            }
        }

        for month in 1..=12u8 {
            let filter = TransactionFilter::for_month(Month::try_from(month).unwrap());

            let got = query_transactions(&filter, None, &conn).unwrap();

            assert_eq!(got.len(), 2, "want 2 transactions for month {month}");
            assert!(
                got.iter()
                    .all(|transaction| u8::from(transaction.date_of_sale.month()) == month)
            );
        }
    }

    #[test]
    fn month_filter_uses_utc_month() {
        let conn = get_test_connection();
        // 2021-04-01 02:00 in India is still March 31st in UTC.
        let transaction = insert("a", "", 1.0, datetime!(2021-04-01 02:00:00 +05:30), &conn);

        let got =
            query_transactions(&TransactionFilter::for_month(Month::March), None, &conn).unwrap();

        assert_eq!(got, vec![transaction]);
    }

    #[test]
    fn search_matches_title_description_and_price_ignoring_case() {
        let conn = get_test_connection();
        let date = datetime!(2022-01-01 00:00:00 UTC);
        let by_title = insert("Solid Gold Petite Micropave", "", 168.0, date, &conn);
        let by_description = insert("Ring", "Classic GOLD plating", 9.99, date, &conn);
        insert("Backpack", "Laptop bag", 109.95, date, &conn);

        let filter = TransactionFilter::from_request(None, Some("gold")).unwrap();
        let got = query_transactions(&filter, None, &conn).unwrap();

        assert_eq!(got, vec![by_title, by_description]);
    }

    #[test]
    fn search_matches_price_as_text() {
        let conn = get_test_connection();
        let date = datetime!(2023-03-05 00:00:00 UTC);
        let fifty = insert("A", "", 50.0, date, &conn);
        insert("B", "", 150.5, date, &conn);
        let hundred_fifty = insert("C", "", 150.0, date, &conn);
        insert("D", "", 5.0, date, &conn);

        let filter = TransactionFilter::from_request(None, Some("50")).unwrap();
        let got = query_transactions(&filter, None, &conn).unwrap();

        // "150.5" also contains "50".
        assert_eq!(got.len(), 3);
        assert_eq!(got[0], fifty);
        assert_eq!(got[2], hundred_fifty);
    }

    #[test]
    fn search_does_not_treat_input_as_a_pattern() {
        let conn = get_test_connection();
        let date = datetime!(2023-03-05 00:00:00 UTC);
        insert("100% cotton", "", 10.0, date, &conn);
        insert("cotton blend", "", 10.0, date, &conn);

        let filter = TransactionFilter::from_request(None, Some("100%")).unwrap();
        let got = query_transactions(&filter, None, &conn).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].title, "100% cotton");
    }

    #[test]
    fn month_and_search_filters_combine() {
        let conn = get_test_connection();
        let want = insert("Gold ring", "", 10.0, datetime!(2022-06-01 00:00:00 UTC), &conn);
        insert("Gold ring", "", 10.0, datetime!(2022-07-01 00:00:00 UTC), &conn);
        insert("Silver ring", "", 10.0, datetime!(2022-06-01 00:00:00 UTC), &conn);

        let filter = TransactionFilter::from_request(Some("6"), Some("gold")).unwrap();
        let got = query_transactions(&filter, None, &conn).unwrap();

        assert_eq!(got, vec![want]);
    }

    #[test]
    fn paginates_in_id_order() {
        let conn = get_test_connection();
        let date = datetime!(2022-01-01 00:00:00 UTC);
        let all: Vec<_> = (1..=7)
            .map(|i| insert(&format!("#{i}"), "", i as f64, date, &conn))
            .collect();

        let page = Page { number: 2, size: 3 };
        let got = query_transactions(&TransactionFilter::default(), Some(page), &conn).unwrap();

        assert_eq!(got, all[3..6]);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let conn = get_test_connection();
        insert("a", "", 1.0, datetime!(2022-01-01 00:00:00 UTC), &conn);

        let page = Page { number: 5, size: 10 };
        let got = query_transactions(&TransactionFilter::default(), Some(page), &conn).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn blank_search_is_ignored() {
        let filter = TransactionFilter::from_request(None, Some("   ")).unwrap();

        assert_eq!(filter, TransactionFilter::default());
    }

    #[test]
    fn blank_month_is_ignored() {
        let filter = TransactionFilter::from_request(Some(""), None).unwrap();

        assert_eq!(filter, TransactionFilter::default());
    }

    #[test]
    fn rejects_invalid_month() {
        for month in ["0", "13", "300", "-1", "abc", "3.5"] {
            assert_eq!(
                TransactionFilter::from_request(Some(month), None),
                Err(Error::InvalidMonth(month.to_owned())),
                "want {month:?} to be rejected"
            );
        }
    }

    #[test]
    fn parses_month_numbers() {
        assert_eq!(parse_month("3"), Ok(Month::March));
        assert_eq!(parse_month("03"), Ok(Month::March));
        assert_eq!(parse_month("12"), Ok(Month::December));
    }
}
