//! The route handler that loads the seed dataset into the database.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

use super::{SeedConfig, load::load_seed_data};

/// The message sent after the seed data has been loaded.
pub const INIT_SUCCESS_MESSAGE: &str = "Database initialized successfully";

/// The state needed to load the seed data.
#[derive(Debug, Clone)]
pub struct InitState {
    /// The database connection to insert transactions with.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where and how to fetch the seed data.
    pub seed_config: SeedConfig,
}

impl FromRef<AppState> for InitState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            seed_config: state.seed_config.clone(),
        }
    }
}

/// The response body for a successful [init_database_endpoint] request.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct InitResponse {
    /// A human readable confirmation.
    pub message: String,
    /// The number of transactions that were inserted.
    pub inserted: usize,
}

/// A route handler that loads the seed data into the database.
///
/// Calling this more than once inserts the seed data again.
pub async fn init_database_endpoint(
    State(state): State<InitState>,
) -> Result<Json<InitResponse>, Error> {
    let inserted = load_seed_data(&state.seed_config, &state.db_connection).await?;

    Ok(Json(InitResponse {
        message: INIT_SUCCESS_MESSAGE.to_owned(),
        inserted,
    }))
}
