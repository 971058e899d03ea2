//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The message sent to clients for any error that is not the client's fault.
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The seed source could not be reached or responded with an error status.
    ///
    /// The string describes the last failed attempt and should only be logged.
    #[error("could not fetch seed data: {0}")]
    Fetch(String),

    /// The seed data was not a JSON array of transaction entries, or one of
    /// the entries had an invalid field (e.g., an unparsable sale date).
    #[error("invalid seed data: {0}")]
    InvalidSeedData(String),

    /// The database rejected a write.
    ///
    /// Writes made before the failing write are kept.
    #[error("could not write to the database: {0}")]
    Persistence(rusqlite::Error),

    /// A read or filter query failed.
    #[error("could not query the database: {0}")]
    Query(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A report was requested without specifying the month to report on.
    #[error("the query parameter \"month\" is required")]
    MissingMonth,

    /// The month was not a number between 1 and 12 (inclusive).
    ///
    /// Holds the month text as it was sent by the client.
    #[error("\"{0}\" is not a valid month, expected a number between 1 and 12")]
    InvalidMonth(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        Error::Query(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::MissingMonth | Error::InvalidMonth(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": INTERNAL_SERVER_ERROR_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}
