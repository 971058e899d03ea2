//! This modules defines the common functionality for paging data.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The number of records per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a request may ask for.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// A validated page request: a 1-based page number and a non-zero page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The 1-based page number.
    pub number: u64,
    /// The maximum number of records on the page.
    pub size: u64,
}

impl Page {
    /// Normalize the optional `page` and `per_page` request parameters.
    ///
    /// A missing or zero page number becomes 1. A missing or zero page size
    /// becomes the configured default, and sizes above the configured maximum
    /// are clamped to the maximum.
    pub fn from_request(page: Option<u64>, per_page: Option<u64>, config: &PaginationConfig) -> Self {
        let number = page.filter(|&page| page > 0).unwrap_or(1);
        let size = per_page
            .filter(|&size| size > 0)
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size.max(1));

        Self { number, size }
    }

    /// The number of records to skip to get to this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1).saturating_mul(self.size)
    }
}

/// Deserialize an optional query parameter, treating an empty value (e.g. `page=`)
/// the same as a missing one.
///
/// Use with `#[serde(default, deserialize_with = "empty_string_as_none")]`.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
