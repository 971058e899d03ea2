//! Retrieval of the raw seed dataset from a URL or a local file.

use std::{path::PathBuf, time::Duration};

use reqwest::{Client, StatusCode};

use crate::Error;

/// The dataset that `POST /api/init` loads by default.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Where to read the seed dataset from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    /// Download the dataset with an HTTP GET request.
    Url(String),
    /// Read the dataset from a local JSON file.
    File(PathBuf),
}

impl Default for SeedSource {
    fn default() -> Self {
        Self::Url(DEFAULT_SEED_URL.to_owned())
    }
}

/// The config for loading the seed dataset.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Where to read the dataset from.
    pub source: SeedSource,
    /// How many times to try downloading the dataset before giving up.
    pub max_attempts: u32,
    /// How long to wait before the first retry. The wait doubles after each retry.
    pub initial_backoff: Duration,
    /// The timeout for each download attempt.
    pub request_timeout: Duration,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            source: SeedSource::default(),
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Why a single download attempt failed.
#[derive(Debug)]
enum AttemptError {
    /// The failure may be temporary, e.g. a timeout or a 503 response.
    Retryable(String),
    /// Trying again will not help, e.g. a 404 response.
    Fatal(String),
}

/// Read the raw seed dataset from the configured source.
///
/// Downloads are retried up to [SeedConfig::max_attempts] times with
/// exponential backoff on connection errors, timeouts and 5xx responses.
///
/// # Errors
/// Returns [Error::Fetch] if the file cannot be read, or if the last download
/// attempt failed or the server responded with a 4xx status.
pub async fn fetch_seed_data(config: &SeedConfig) -> Result<String, Error> {
    match &config.source {
        SeedSource::Url(url) => fetch_url(url, config).await,
        SeedSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|error| Error::Fetch(format!("could not read {}: {error}", path.display()))),
    }
}

async fn fetch_url(url: &str, config: &SeedConfig) -> Result<String, Error> {
    let client = Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|error| Error::Fetch(format!("could not create HTTP client: {error}")))?;

    let max_attempts = config.max_attempts.max(1);
    let mut backoff = config.initial_backoff;
    let mut attempt = 1;

    loop {
        tracing::debug!("Fetching seed data from {url} (attempt {attempt}/{max_attempts})");

        match try_fetch_url(&client, url).await {
            Ok(body) => return Ok(body),
            Err(AttemptError::Retryable(reason)) if attempt < max_attempts => {
                tracing::warn!(
                    "Could not fetch seed data from {url}: {reason}. Retrying in {backoff:?}."
                );
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(2);
                attempt += 1;
            }
            Err(AttemptError::Retryable(reason) | AttemptError::Fatal(reason)) => {
                return Err(Error::Fetch(format!("{url}: {reason}")));
            }
        }
    }
}

async fn try_fetch_url(client: &Client, url: &str) -> Result<String, AttemptError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|error| AttemptError::Retryable(error.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let reason = format!("server responded with {status}");
        return Err(if is_retryable(status) {
            AttemptError::Retryable(reason)
        } else {
            AttemptError::Fatal(reason)
        });
    }

    response
        .text()
        .await
        .map_err(|error| AttemptError::Retryable(error.to_string()))
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}
