use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    process::exit,
    time::Duration,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use storefront_stats::{
    AppState, DEFAULT_SEED_URL, PaginationConfig, SeedConfig, SeedSource, build_router,
    count_transactions, graceful_shutdown, load_seed_data, logging_middleware,
};

/// The REST API server for storefront_stats.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The address to listen on.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The URL of the JSON seed dataset loaded by `POST /api/init`.
    #[arg(long, default_value = DEFAULT_SEED_URL)]
    seed_url: String,

    /// Load the seed dataset from this JSON file instead of `--seed-url`.
    #[arg(long)]
    seed_file: Option<PathBuf>,

    /// Load the seed dataset on start up if the database has no transactions.
    #[arg(long)]
    seed_on_start: bool,

    /// The number of transactions per page when a request does not specify one.
    #[arg(long, default_value_t = 10)]
    page_size: u64,

    /// The largest number of transactions per page a request may ask for.
    #[arg(long, default_value_t = 100)]
    max_page_size: u64,

    /// How many seconds a request may take before it is cancelled.
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::new(args.host, args.port);

    let seed_source = match args.seed_file {
        Some(path) => SeedSource::File(path),
        None => SeedSource::Url(args.seed_url),
    };
    let seed_config = SeedConfig {
        source: seed_source,
        ..SeedConfig::default()
    };
    let pagination_config = PaginationConfig {
        default_page_size: args.page_size,
        max_page_size: args.max_page_size,
    };

    let conn = Connection::open(&args.db_path).unwrap_or_else(|error| {
        tracing::error!("Could not open database file at {}: {error}", args.db_path);
        exit(1);
    });
    let app_state = AppState::new(conn, seed_config, pagination_config).unwrap_or_else(|error| {
        tracing::error!("Could not initialize database: {error}");
        exit(1);
    });

    if args.seed_on_start {
        seed_if_empty(&app_state).await;
    }

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(app_state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(args.request_timeout_secs),
        ));
    let router = add_tracing_layer(router);

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        exit(1);
    }
}

async fn seed_if_empty(app_state: &AppState) {
    let count = match app_state.db_connection.lock() {
        Ok(connection) => count_transactions(&connection),
        Err(_) => Err(storefront_stats::Error::DatabaseLockError),
    };

    match count {
        Ok(0) => {
            tracing::info!("Database is empty, loading seed data...");
            if let Err(error) = load_seed_data(&app_state.seed_config, &app_state.db_connection).await
            {
                tracing::error!("Could not load seed data: {error}");
            }
        }
        Ok(count) => tracing::info!("Database already has {count} transactions, skipping seed data"),
        Err(error) => tracing::error!("Could not count transactions: {error}"),
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
