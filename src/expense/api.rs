//! This month's expenses as JSON.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    Error,
    expense::{Amount, CalendarMonth, Expense, ExpenseState, MonthlyTotal, WorkingSet},
};

/// A snapshot of one month's expenses and their total.
#[derive(Debug, Serialize)]
pub struct MonthSummary {
    /// The calendar year, e.g. 2026.
    pub year: i32,
    /// The English month name, e.g. "October".
    pub month: String,
    /// The sum of `expenses`, as text with two decimal places.
    pub total: Amount,
    /// The expenses in the month, oldest entry first.
    pub expenses: Vec<Expense>,
}

impl MonthSummary {
    fn new(working_set: WorkingSet, total: MonthlyTotal) -> Self {
        let month = working_set.month();

        Self {
            year: month.year(),
            month: month.month().to_string(),
            total: total.total,
            expenses: working_set.expenses().to_vec(),
        }
    }
}

/// Return this month's expenses and total as JSON.
pub async fn get_expenses_json(State(state): State<ExpenseState>) -> Response {
    let timezone = match state.timezone() {
        Ok(timezone) => timezone,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let month = CalendarMonth::current(timezone);
    let summary = WorkingSet::fetch(month, &connection).and_then(|working_set| {
        MonthlyTotal::compute(month, &connection).map(|total| MonthSummary::new(working_set, total))
    });

    match summary {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => {
            tracing::error!("could not load this month's expenses: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode};
    use serde_json::Value;
    use time::OffsetDateTime;

    use crate::{
        expense::{Expense, ExpenseName, get_expenses_json, get_test_expense_state, insert_expense},
        test_utils::assert_content_type,
    };

    #[tokio::test]
    async fn returns_month_total_and_expenses() {
        let state = get_test_expense_state();
        let now = OffsetDateTime::now_utc();
        for (name, amount) in [("Coffee", "10.00"), ("Lunch", "20.25")] {
            insert_expense(
                Expense::build(
                    ExpenseName::new_unchecked(name),
                    amount.parse().unwrap(),
                    now,
                ),
                &state.db_connection.lock().unwrap(),
            )
            .unwrap();
        }

        let response = get_expenses_json(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "application/json");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["total"], "30.25");
        assert_eq!(json["year"], now.year());
        assert_eq!(json["expenses"][0]["name"], "Coffee");
        assert_eq!(json["expenses"][0]["amount"], "10.00");
        assert_eq!(json["expenses"][1]["name"], "Lunch");
    }
}
