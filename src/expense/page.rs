//! The app shell and the expense panel that is loaded into it.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use maud::Markup;
use rusqlite::Connection;
use time_tz::Tz;

use crate::{
    Error,
    expense::{
        CalendarMonth, ExpenseState, MonthlyTotal, WorkingSet,
        view::{app_shell_view, expense_panel_view},
    },
};

/// Render the app shell.
///
/// Served for both `/` and `/index.html`.
pub async fn get_app_shell() -> Response {
    app_shell_view().into_response()
}

/// Render this month's total and expenses as an HTML fragment.
pub async fn get_expense_panel(State(state): State<ExpenseState>) -> Response {
    let timezone = match state.timezone() {
        Ok(timezone) => timezone,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match current_panel(timezone, &connection) {
        Ok(panel) => Html(panel.into_string()).into_response(),
        Err(error) => {
            tracing::error!("could not load this month's expenses: {error}");
            error.into_alert_response()
        }
    }
}

/// Read the current month's snapshot and total, and render them.
///
/// The month is worked out once so that the list and the total always cover
/// the same month, even when called right at a month boundary.
pub(super) fn current_panel(
    timezone: &'static Tz,
    connection: &Connection,
) -> Result<Markup, Error> {
    let month = CalendarMonth::current(timezone);
    let working_set = WorkingSet::fetch(month, connection)?;
    let total = MonthlyTotal::compute(month, connection)?;

    Ok(expense_panel_view(&working_set, &total))
}
