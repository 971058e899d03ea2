//! Loading the product transaction seed dataset.
//!
//! The dataset is a JSON array of products fetched from a URL (or read from a
//! local file), validated as a whole and then inserted one product at a time.

mod entry;
mod fetch;
mod init_endpoint;
mod load;

pub use fetch::{DEFAULT_SEED_URL, SeedConfig, SeedSource};
pub use init_endpoint::init_database_endpoint;
pub use load::load_seed_data;
