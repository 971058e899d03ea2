//! Sets up the application database: the SQL functions used by queries and the tables.

use rusqlite::{Connection, functions::FunctionFlags};

use crate::{
    Error,
    transaction::{create_transaction_table, format_price},
};

/// The name of the SQL function `contains_text(haystack, needle)`.
///
/// Returns true if `needle` occurs in `haystack`, ignoring case.
/// Returns false if either argument is NULL.
pub(crate) const CONTAINS_TEXT_FN: &str = "contains_text";

/// The name of the SQL function `price_text(price)` that renders a price the
/// way it is shown to clients, e.g. `50` for 50.0 and `329.85` for 329.85.
pub(crate) const PRICE_TEXT_FN: &str = "price_text";

/// Create the tables and register the SQL functions for the application.
///
/// This must be called on every connection before it is used for queries,
/// since SQL functions are registered per connection.
///
/// # Errors
/// Returns [Error::Persistence] if the functions cannot be registered or the
/// tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    register_functions(connection).map_err(Error::Persistence)?;
    create_transaction_table(connection).map_err(Error::Persistence)?;

    Ok(())
}

fn register_functions(connection: &Connection) -> Result<(), rusqlite::Error> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    connection.create_scalar_function(CONTAINS_TEXT_FN, 2, flags, |context| {
        let haystack: Option<String> = context.get(0)?;
        let needle: Option<String> = context.get(1)?;

        Ok(match (haystack, needle) {
            (Some(haystack), Some(needle)) => contains_ignore_case(&haystack, &needle),
            _ => false,
        })
    })?;

    connection.create_scalar_function(PRICE_TEXT_FN, 1, flags, |context| {
        let price: f64 = context.get(0)?;
        Ok(format_price(price))
    })?;

    Ok(())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
