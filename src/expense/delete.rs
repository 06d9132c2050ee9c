//! Expense deletion endpoint.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};

use crate::{
    Error,
    expense::{ExpenseId, ExpenseState, db::delete_expense, page::current_panel},
};

/// Handle expense deletion and return the refreshed panel.
///
/// Answers with a 404 alert when there is no expense with the ID `expense_id`.
pub async fn delete_expense_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<ExpenseState>,
) -> Response {
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

    match delete_expense(expense_id, &connection) {
        Ok(()) => tracing::info!("deleted expense {expense_id}"),
        Err(Error::DeleteMissingExpense) => {
            tracing::warn!("tried to delete missing expense {expense_id}");
            return Error::DeleteMissingExpense.into_alert_response();
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting expense {expense_id}: {error}"
            );
            return error.into_alert_response();
        }
    }

    match current_panel(timezone, &connection) {
        Ok(panel) => Html(panel.into_string()).into_response(),
        Err(error) => {
            tracing::error!("could not reload this month's expenses: {error}");
            error.into_alert_response()
        }
    }
}
