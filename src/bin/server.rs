use std::{
    fs::OpenOptions,
    net::SocketAddr,
    path::{Path, PathBuf},
    process::exit,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use expense_tracker::{
    ASSET_MANIFEST, AppState, CacheStorage, MonthlyTotal, StaticAssets, WorkingSet, activate,
    build_router, cache_name, get_timezone, graceful_shutdown, install, logging_middleware,
    open_or_create,
};

/// The web server for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The directory with the files served under `/static`.
    #[arg(long, default_value = "static")]
    static_dir: PathBuf,

    /// The directory that holds the offline asset caches.
    #[arg(long, default_value = "offline-cache")]
    cache_dir: PathBuf,

    /// File path to an SSL certificate `cert.pem` and key `key.pem`.
    ///
    /// The server uses plain HTTP if this is not set.
    #[arg(long)]
    cert_path: Option<String>,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the timezone used to decide which month it is, e.g. "Asia/Kolkata".
    #[arg(long, env = "EXPENSE_TRACKER_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let Some(timezone) = get_timezone(&args.timezone) else {
        tracing::error!("\"{}\" is not a valid canonical timezone", args.timezone);
        exit(1);
    };

    let connection = match open_or_create(&args.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not open the expense database: {error}");
            exit(1);
        }
    };

    match WorkingSet::fetch_current_month(timezone, &connection)
        .and_then(|working_set| {
            MonthlyTotal::compute_current_month(timezone, &connection)
                .map(|total| (working_set, total))
        }) {
        Ok((working_set, total)) => tracing::info!(
            "loaded {} expenses for {}, {total}",
            working_set.len(),
            working_set.month()
        ),
        Err(error) => tracing::error!("could not load this month's expenses: {error}"),
    }

    let storage = CacheStorage::new(&args.cache_dir);
    let offline_cache = match install_offline_cache(&storage, &args.static_dir).await {
        Ok(cache) => cache,
        Err(error) => {
            tracing::error!(
                "could not set up the offline cache in {}: {error}",
                args.cache_dir.display()
            );
            exit(1);
        }
    };

    let state = match AppState::new(connection, &args.timezone, &args.static_dir, offline_cache) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("could not create the app state: {error}");
            exit(1);
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let result = match args.cert_path {
        Some(cert_path) => {
            let tls_config = match RustlsConfig::from_pem_file(
                PathBuf::from(&cert_path).join("cert.pem"),
                PathBuf::from(&cert_path).join("key.pem"),
            )
            .await
            {
                Ok(config) => config,
                Err(error) => {
                    tracing::error!("could not open TLS certificates in {cert_path}: {error}");
                    exit(1);
                }
            };

            tracing::info!("HTTPS server listening on {}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(router.into_make_service())
                .await
        }
        None => {
            tracing::info!("HTTP server listening on {}", addr);
            axum_server::bind(addr)
                .handle(handle)
                .serve(router.into_make_service())
                .await
        }
    };

    if let Err(error) = result {
        tracing::error!("server stopped with an error: {error}");
        exit(1);
    }
}

/// Fill the current offline cache from the static directory and drop older revisions.
async fn install_offline_cache(
    storage: &CacheStorage,
    static_dir: &Path,
) -> Result<expense_tracker::Cache, expense_tracker::Error> {
    let (cache, report) = install(
        storage,
        &cache_name(),
        &ASSET_MANIFEST,
        &StaticAssets::new(static_dir),
    )
    .await?;

    if !report.failed.is_empty() {
        tracing::warn!(
            "these assets will not be available offline: {:?}",
            report.failed
        );
    }

    let deleted = activate(storage, cache.name()).await?;
    if !deleted.is_empty() {
        tracing::info!("removed {} stale offline caches", deleted.len());
    }

    Ok(cache)
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
    {
        Ok(file) => file,
        Err(error) => {
            eprintln!("Could not create log file: {error}");
            exit(1);
        }
    };

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
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
