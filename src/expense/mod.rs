//! Recording expenses and showing what was spent this month.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use time_tz::Tz;

use crate::{AppState, Error, timezone::get_timezone};

mod api;
mod core;
mod create;
mod db;
mod delete;
mod month;
mod page;
mod view;
mod working_set;

pub use api::get_expenses_json;
pub use core::{Amount, Expense, ExpenseId, ExpenseName, NewExpense};
pub use create::create_expense_endpoint;
pub use db::{create_expense_table, insert_expense};
pub use delete::delete_expense_endpoint;
pub use month::CalendarMonth;
pub use page::{get_app_shell, get_expense_panel};
pub use view::app_shell_view;
pub use working_set::{MonthlyTotal, WorkingSet};

/// The state needed by the expense pages and endpoints.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The database connection shared by all requests.
    ///
    /// A write and the refetch that follows it happen while holding the lock,
    /// so a response never shows a half-applied change.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl ExpenseState {
    fn timezone(&self) -> Result<&'static Tz, Error> {
        get_timezone(&self.local_timezone).ok_or_else(|| {
            tracing::error!("invalid timezone {}", self.local_timezone);
            Error::InvalidTimezoneError(self.local_timezone.clone())
        })
    }
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) fn get_test_expense_state() -> ExpenseState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    crate::db::initialize(&connection).expect("Could not initialize database");

    ExpenseState {
        db_connection: Arc::new(Mutex::new(connection)),
        local_timezone: "Etc/UTC".to_owned(),
    }
}
