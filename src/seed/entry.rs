//! Parsing of the seed dataset into product transaction builders.

use serde::Deserialize;
use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};

use crate::{Error, transaction::ProductTransactionBuilder};

/// One entry of the seed dataset.
///
/// Keys that are not listed here, such as `id` and `image`, are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedEntry {
    /// The name of the product.
    pub title: String,
    /// The product description.
    pub description: String,
    /// The product price.
    pub price: f64,
    /// The product category.
    pub category: String,
    /// Whether the product was sold.
    pub sold: bool,
    /// When the product was sold, as an RFC 3339 date-time or a `YYYY-MM-DD` date.
    pub date_of_sale: String,
}

impl SeedEntry {
    /// Validate the entry and convert it into a builder ready to be stored.
    ///
    /// # Errors
    /// Returns [Error::InvalidSeedData] if the price is negative or not a
    /// number, or if the sale date cannot be parsed.
    pub fn into_builder(self) -> Result<ProductTransactionBuilder, Error> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::InvalidSeedData(format!(
                "\"{}\" has an invalid price {}",
                self.title, self.price
            )));
        }

        let date_of_sale = parse_date_of_sale(&self.date_of_sale)?;

        Ok(ProductTransactionBuilder {
            title: self.title,
            description: self.description,
            price: self.price,
            category: self.category,
            date_of_sale,
            sold: self.sold,
        })
    }
}

/// Parse the seed dataset, a JSON array of [SeedEntry].
///
/// Every entry is validated before any builder is returned, so a dataset with
/// a single bad entry is rejected as a whole.
///
/// # Errors
/// Returns [Error::InvalidSeedData] if `json` is not an array of entries or if
/// any entry is invalid.
pub fn parse_seed_data(json: &str) -> Result<Vec<ProductTransactionBuilder>, Error> {
    let entries: Vec<SeedEntry> =
        serde_json::from_str(json).map_err(|error| Error::InvalidSeedData(error.to_string()))?;

    entries.into_iter().map(SeedEntry::into_builder).collect()
}

/// Parse an RFC 3339 date-time, falling back to a plain date at midnight UTC.
fn parse_date_of_sale(text: &str) -> Result<OffsetDateTime, Error> {
    OffsetDateTime::parse(text, &Rfc3339)
        .or_else(|_| {
            Date::parse(text, format_description!("[year]-[month]-[day]"))
                .map(|date| date.midnight().assume_utc())
        })
        .map_err(|error| {
            Error::InvalidSeedData(format!("could not parse the date of sale \"{text}\": {error}"))
        })
}
