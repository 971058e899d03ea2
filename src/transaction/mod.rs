//! Product transaction storage and listing.
//!
//! This module contains everything related to product transactions:
//! - The `ProductTransaction` model and `ProductTransactionBuilder` for creating transactions
//! - Database functions for storing, filtering and paging transactions
//! - The route handler for listing transactions

mod core;
mod list_endpoint;
mod query;

pub use core::{
    ProductTransaction, ProductTransactionBuilder, count_transactions, create_transaction,
    create_transaction_table, format_price,
};
pub use list_endpoint::list_transactions_endpoint;
pub use query::{TransactionFilter, parse_month, query_transactions};
