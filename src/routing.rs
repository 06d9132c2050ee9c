//! Application router configuration with offline-cached and live route definitions.

use axum::{
    Router, middleware,
    routing::{delete, get},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_app_shell, get_expense_panel,
        get_expenses_json,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    offline::{cache_first, get_service_worker},
};

/// Return a router with all the app's routes.
///
/// The app shell and static files are answered from the offline cache first.
/// Expense data and the service worker script always come from the live handlers.
pub fn build_router(state: AppState) -> Router {
    let offline_routes = Router::new()
        .route(endpoints::ROOT, get(get_app_shell))
        .route(endpoints::INDEX_HTML, get(get_app_shell))
        .nest_service(endpoints::STATIC, ServeDir::new(&state.static_dir))
        .layer(middleware::from_fn_with_state(
            state.offline_cache.clone(),
            cache_first,
        ));

    let live_routes = Router::new()
        .route(endpoints::EXPENSE_PANEL_VIEW, get(get_expense_panel))
        .route(
            endpoints::EXPENSES_API,
            get(get_expenses_json).post(create_expense_endpoint),
        )
        .route(endpoints::DELETE_EXPENSE, delete(delete_expense_endpoint))
        .route(endpoints::SERVICE_WORKER, get(get_service_worker))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    offline_routes
        .merge(live_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
