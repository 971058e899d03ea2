use std::error::Error;
use std::path::PathBuf;
use std::process::exit;
use std::sync::Mutex;

use clap::Parser;
use rusqlite::Connection;

use storefront_stats::{
    DEFAULT_SEED_URL, SeedConfig, SeedSource, count_transactions, initialize_db, load_seed_data,
};

/// A utility for loading the product transaction seed dataset into a database for storefront_stats.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. The database is created if it does not exist.
    #[arg(long, short)]
    db_path: PathBuf,

    /// Read the seed dataset from this JSON file.
    #[arg(long, short, conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Download the seed dataset from this URL.
    #[arg(long, default_value = DEFAULT_SEED_URL)]
    url: String,
}

/// Create or open a database and load the seed dataset into it.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if args.db_path.extension().is_none_or(|extension| extension.is_empty()) {
        eprintln!("Database path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    println!("Opening database at {:#?}", args.db_path);
    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    let existing = count_transactions(&conn)?;
    if existing > 0 {
        println!("Database already has {existing} transactions, the seed data will be added again.");
    }

    let source = match args.input {
        Some(path) => SeedSource::File(path),
        None => SeedSource::Url(args.url),
    };
    let seed_config = SeedConfig {
        source,
        ..SeedConfig::default()
    };

    println!("Loading seed data...");
    let conn = Mutex::new(conn);
    let inserted = load_seed_data(&seed_config, &conn).await?;

    println!("Success! Inserted {inserted} transactions.");

    Ok(())
}
