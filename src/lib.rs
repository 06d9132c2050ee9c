//! An expense tracker web app for keeping an eye on this month's spending.
//!
//! The server owns a small SQLite store of expenses, renders the pages as HTML
//! and serves its static assets through a versioned offline cache so that the
//! app shell keeps working without a network connection.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod db;
mod endpoints;
mod error;
mod expense;
mod html;
mod internal_server_error;
mod logging;
mod not_found;
mod offline;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::{initialize as initialize_db, open_or_create};
pub use error::Error;
pub use expense::{
    Amount, CalendarMonth, Expense, ExpenseId, ExpenseName, MonthlyTotal, NewExpense, WorkingSet,
    insert_expense,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use offline::{
    ASSET_MANIFEST, AssetSource, Cache, CacheStorage, CachedAsset, InstallReport, StaticAssets,
    activate, cache_name, install,
};
pub use routing::build_router;
pub use timezone::get_timezone;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
