//! Loading the seed dataset into the database.

use std::sync::Mutex;

use rusqlite::Connection;

use crate::{
    Error,
    transaction::{ProductTransactionBuilder, create_transaction},
};

use super::{SeedConfig, entry::parse_seed_data, fetch::fetch_seed_data};

/// Fetch the seed dataset and insert one product transaction per entry.
///
/// The dataset is fetched and validated before the database lock is taken.
/// Existing transactions are kept, so loading the dataset twice stores every
/// entry twice.
///
/// # Returns
/// The number of transactions inserted.
///
/// # Errors
/// Returns:
/// - [Error::Fetch] if the dataset could not be fetched,
/// - [Error::InvalidSeedData] if the dataset is invalid, in which case nothing is inserted,
/// - [Error::DatabaseLockError] if the database lock is poisoned,
/// - or [Error::Persistence] if an insert fails. Transactions inserted before
///   the failure are kept.
pub async fn load_seed_data(
    config: &SeedConfig,
    db_connection: &Mutex<Connection>,
) -> Result<usize, Error> {
    let json = fetch_seed_data(config).await?;
    let builders = parse_seed_data(&json)?;

    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let inserted = insert_seed_data(builders, &connection)?;
    tracing::info!("Inserted {inserted} product transactions from the seed data");

    Ok(inserted)
}

/// Insert each builder as a new product transaction, in order.
///
/// # Errors
/// Returns [Error::Persistence] for the first insert that fails. Earlier inserts are kept.
pub fn insert_seed_data(
    builders: Vec<ProductTransactionBuilder>,
    connection: &Connection,
) -> Result<usize, Error> {
    let mut inserted = 0;

    for builder in builders {
        create_transaction(builder, connection).inspect_err(|error| {
            tracing::error!("could not insert seed entry #{}: {error}", inserted + 1)
        })?;
        inserted += 1;
    }

    Ok(inserted)
}
