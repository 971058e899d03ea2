//! Defines the core data model and database queries for product transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::Error;

/// Alias for the integer type used for product transaction IDs.
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// The sale (or listing, if unsold) of a product.
///
/// To create a new `ProductTransaction`, use [ProductTransaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTransaction {
    /// The ID of the transaction. IDs increase in insertion order.
    pub id: TransactionId,
    /// The name of the product.
    pub title: String,
    /// A longer text description of the product.
    pub description: String,
    /// The price of the product, never negative.
    pub price: f64,
    /// The category label of the product, e.g. "electronics".
    pub category: String,
    /// When the product was sold, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// Whether the product has actually been sold.
    pub sold: bool,
}

impl ProductTransaction {
    /// Create a new product transaction.
    ///
    /// Shortcut for [ProductTransactionBuilder] for discoverability.
    pub fn build(title: &str, price: f64, date_of_sale: OffsetDateTime) -> ProductTransactionBuilder {
        ProductTransactionBuilder {
            title: title.to_owned(),
            description: String::new(),
            price,
            category: String::new(),
            date_of_sale,
            sold: false,
        }
    }
}

/// A builder for creating [ProductTransaction] instances.
///
/// The optional fields default to an empty description, an empty category and
/// `sold = false`. Pass the builder to [create_transaction] to store it.
#[derive(Debug, PartialEq, Clone)]
pub struct ProductTransactionBuilder {
    /// The name of the product.
    pub title: String,

    /// A longer text description of the product.
    pub description: String,

    /// The price of the product.
    ///
    /// Prices are compared against the fixed price ranges of the bar chart
    /// report and, as text, against search queries.
    pub price: f64,

    /// The category label, e.g. "men's clothing".
    pub category: String,

    /// When the product was sold.
    ///
    /// Any offset is accepted, the date-time is converted to UTC when stored
    /// and month filters use the UTC month.
    pub date_of_sale: OffsetDateTime,

    /// Whether the product has been sold.
    pub sold: bool,
}

impl ProductTransactionBuilder {
    /// Set the description of the product.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category of the product.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set whether the product has been sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }
}

/// Render a price as text, e.g. `50` for 50.0 and `329.85` for 329.85.
///
/// Search queries are matched against this text, so searching for "50" finds
/// products priced 50, 150 or 50.99.
pub fn format_price(price: f64) -> String {
    price.to_string()
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new product transaction in the database from a builder.
///
/// # Errors
/// This function will return a [Error::Persistence] if the insert is rejected.
pub fn create_transaction(
    builder: ProductTransactionBuilder,
    connection: &Connection,
) -> Result<ProductTransaction, Error> {
    connection
        .prepare(
            "INSERT INTO product_transaction (title, description, price, category, date_of_sale, sold)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, title, description, price, category, date_of_sale, sold",
        )
        .and_then(|mut statement| {
            statement.query_row(
                (
                    builder.title,
                    builder.description,
                    builder.price,
                    builder.category,
                    builder.date_of_sale.to_offset(UtcOffset::UTC),
                    builder.sold,
                ),
                map_transaction_row,
            )
        })
        .map_err(Error::Persistence)
}

/// Get the total number of product transactions in the database.
///
/// # Errors
/// This function will return a [Error::Query] if there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM product_transaction", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the product transaction table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS product_transaction (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL CHECK (price >= 0),
                category TEXT NOT NULL,
                date_of_sale TEXT NOT NULL,
                sold INTEGER NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [ProductTransaction].
///
/// Expects the columns in table order.
pub fn map_transaction_row(row: &Row) -> Result<ProductTransaction, rusqlite::Error> {
    Ok(ProductTransaction {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
        date_of_sale: row.get(5)?,
        sold: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
