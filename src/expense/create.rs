//! Expense creation endpoint.

use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    expense::{Amount, Expense, ExpenseName, ExpenseState, db::insert_expense, page::current_panel},
};

/// The fields submitted by the expense form.
///
/// The amount is kept as text so that a bad value can be echoed back in the error.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    /// What the money was spent on.
    pub name: String,
    /// How much was spent, e.g. "3.50".
    pub amount: String,
}

/// Handle expense form submission.
///
/// The expense is dated now and saved, then the refreshed panel is returned
/// so the client can swap it in. Invalid input is answered with an alert and
/// nothing is written.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let name = match ExpenseName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    let amount: Amount = match form.amount.parse() {
        Ok(amount) => amount,
        Err(error) => return error.into_alert_response(),
    };

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

    let new_expense = Expense::build(name, amount, OffsetDateTime::now_utc());

    match insert_expense(new_expense, &connection) {
        Ok(expense) => tracing::info!(
            "recorded expense {} \"{}\" for {}",
            expense.id,
            expense.name,
            expense.amount
        ),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an expense: {error}");
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

#[cfg(test)]
mod tests {
    use axum::{Form, extract::State, http::StatusCode};
    use scraper::Selector;

    use crate::{
        expense::{ExpenseState, create_expense_endpoint, get_test_expense_state},
        test_utils::{assert_valid_html, parse_html_fragment},
    };

    use super::ExpenseForm;

    fn form(name: &str, amount: &str) -> Form<ExpenseForm> {
        Form(ExpenseForm {
            name: name.to_owned(),
            amount: amount.to_owned(),
        })
    }

    fn count_expenses(state: &ExpenseState) -> i64 {
        state
            .db_connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM expense", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn creates_expense_and_returns_refreshed_panel() {
        let state = get_test_expense_state();

        let response = create_expense_endpoint(State(state.clone()), form("Coffee", "3.5")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let rows = html
            .select(&Selector::parse("#expense-list li div").unwrap())
            .map(|row| row.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(rows, vec!["₹3.50 - Coffee"]);
        assert_eq!(count_expenses(&state), 1);
    }

    #[tokio::test]
    async fn total_adds_up_to_the_cent() {
        let state = get_test_expense_state();

        create_expense_endpoint(State(state.clone()), form("Coffee", "10.00")).await;
        let response = create_expense_endpoint(State(state), form("Lunch", "20.25")).await;

        let html = parse_html_fragment(response).await;
        let total = html
            .select(&Selector::parse("#total-expenditure").unwrap())
            .next()
            .expect("No total found")
            .text()
            .collect::<String>();
        assert!(total.ends_with(": ₹30.25"), "got total {total:?}");
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let state = get_test_expense_state();

        let response = create_expense_endpoint(State(state.clone()), form("   ", "3.50")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(count_expenses(&state), 0);
    }

    #[tokio::test]
    async fn invalid_amounts_are_rejected() {
        let state = get_test_expense_state();

        for amount in ["", "abc", "0", "-1"] {
            let response =
                create_expense_endpoint(State(state.clone()), form("Coffee", amount)).await;

            assert_eq!(
                response.status(),
                StatusCode::BAD_REQUEST,
                "amount {amount:?} should be rejected"
            );
        }

        assert_eq!(count_expenses(&state), 0);
    }

    #[tokio::test]
    async fn amounts_too_large_to_total_are_rejected() {
        let state = get_test_expense_state();

        for _ in 0..2 {
            let response = create_expense_endpoint(
                State(state.clone()),
                form("Typo", "50000000000000000000000000000"),
            )
            .await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        assert_eq!(count_expenses(&state), 0);
        let response = create_expense_endpoint(State(state), form("Coffee", "3.50")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn overflowing_stored_total_is_an_error_not_a_crash() {
        let state = get_test_expense_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let now = time::OffsetDateTime::now_utc().unix_timestamp();
            for _ in 0..2 {
                connection
                    .execute(
                        "INSERT INTO expense (name, amount, date) VALUES ('Typo', ?1, ?2)",
                        ("50000000000000000000000000000", now),
                    )
                    .unwrap();
            }
        }

        let response = create_expense_endpoint(State(state.clone()), form("Coffee", "3.50")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            !state.db_connection.is_poisoned(),
            "the database lock should still be usable"
        );
        assert_eq!(count_expenses(&state), 3);
    }
}
