//! HTML views for the expense tracker: the app shell and the expense panel.

use maud::{Markup, PreEscaped, html};

use crate::{
    endpoints,
    expense::{Expense, MonthlyTotal, WorkingSet},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, LIST_ITEM_STYLE, PAGE_CONTAINER_STYLE, base,
        format_currency,
    },
};

/// The page that hosts the expense form and panel.
///
/// The shell does not contain any expenses, so it can be cached and served
/// offline. `static/app.js` loads the panel from [endpoints::EXPENSE_PANEL_VIEW].
pub fn app_shell_view() -> Markup {
    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-6" { "Expense Tracker" }

            div class=(FORM_CONTAINER_STYLE)
            {
                (expense_form_view())
            }

            section
                id="expense-panel"
                data-src=(endpoints::EXPENSE_PANEL_VIEW)
                aria-live="polite"
                class="w-full max-w-md mt-8"
            {
                p class="text-gray-500 dark:text-gray-400" { "Loading expenses…" }
            }
        }
    };

    base(
        "Expenses",
        &[HeadElement::ScriptSource(PreEscaped(
            service_worker_registration_script(),
        ))],
        &content,
    )
}

fn expense_form_view() -> Markup {
    html! {
        form
            id="expense-form"
            action=(endpoints::EXPENSES_API)
            method="post"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="expense-name" class=(FORM_LABEL_STYLE) { "Expense" }

                input
                    id="expense-name"
                    type="text"
                    name="name"
                    placeholder="Coffee"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="expense-amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    id="expense-amount"
                    type="number"
                    name="amount"
                    placeholder="0.00"
                    step="0.01"
                    min="0.01"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
        }
    }
}

/// The monthly total followed by the list of this month's expenses.
///
/// Each row carries the delete URL for its expense, so a click on the
/// delete button always refers to the expense that was drawn in that row.
pub fn expense_panel_view(working_set: &WorkingSet, total: &MonthlyTotal) -> Markup {
    html! {
        h2 id="total-expenditure" class="text-xl font-bold mb-4" { (total) }

        ul id="expense-list" class="w-full"
        {
            @for expense in working_set.expenses() {
                (expense_row_view(expense))
            }

            @if working_set.is_empty() {
                li class="px-4 py-3 text-center text-gray-500 dark:text-gray-400"
                {
                    "No expenses in " (working_set.month()) " yet."
                }
            }
        }
    }
}

fn expense_row_view(expense: &Expense) -> Markup {
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_EXPENSE, expense.id);

    html! {
        li class=(LIST_ITEM_STYLE)
        {
            div { (format_currency(&expense.amount)) " - " (expense.name) }

            button
                type="button"
                data-delete-url=(delete_url)
                class=(BUTTON_DELETE_STYLE)
            {
                "Delete"
            }
        }
    }
}

fn service_worker_registration_script() -> String {
    format!(
        r#"
        if ("serviceWorker" in navigator) {{
            window.addEventListener("load", function () {{
                navigator.serviceWorker
                    .register("{}")
                    .then(() => console.log("service worker registered"))
                    .catch((error) => console.log("service worker not registered", error));
            }});
        }}
        "#,
        endpoints::SERVICE_WORKER
    )
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        endpoints,
        expense::{Amount, CalendarMonth, Expense, ExpenseName, MonthlyTotal, WorkingSet},
        test_utils::{
            assert_form_input, assert_form_submit_button_with_text, assert_valid_html, must_get_form,
        },
        timezone::get_timezone,
    };

    use super::{app_shell_view, expense_panel_view};

    #[test]
    fn app_shell_has_expense_form() {
        let html = Html::parse_document(&app_shell_view().into_string());
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_eq!(form.value().attr("action"), Some(endpoints::EXPENSES_API));
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_submit_button_with_text(&form, "Add Expense");
    }

    #[test]
    fn app_shell_registers_service_worker() {
        let html = app_shell_view().into_string();

        assert!(html.contains("navigator.serviceWorker"));
        assert!(html.contains(endpoints::SERVICE_WORKER));
    }

    #[test]
    fn panel_lists_amount_and_name_with_delete_button() {
        let october = CalendarMonth::containing(
            datetime!(2026-10-16 12:00 UTC),
            get_timezone("Etc/UTC").unwrap(),
        );
        let working_set = WorkingSet::from_expenses(
            october,
            vec![Expense {
                id: 7,
                name: ExpenseName::new_unchecked("Coffee"),
                amount: "3.5".parse().unwrap(),
                date: datetime!(2026-10-16 08:00 UTC),
            }],
        );
        let total = MonthlyTotal {
            month: october,
            total: "3.5".parse().unwrap(),
        };

        let html = Html::parse_fragment(&expense_panel_view(&working_set, &total).into_string());
        assert_valid_html(&html);

        let heading = html
            .select(&Selector::parse("#total-expenditure").unwrap())
            .next()
            .expect("No total found")
            .text()
            .collect::<String>();
        assert_eq!(heading, "October: ₹3.50");

        let row = html
            .select(&Selector::parse("#expense-list li div").unwrap())
            .next()
            .expect("No expense row found")
            .text()
            .collect::<String>();
        assert_eq!(row, "₹3.50 - Coffee");

        let button = html
            .select(&Selector::parse("#expense-list li button").unwrap())
            .next()
            .expect("No delete button found");
        assert_eq!(button.value().attr("data-delete-url"), Some("/api/expenses/7"));
    }

    #[test]
    fn empty_panel_shows_placeholder() {
        let october = CalendarMonth::containing(
            datetime!(2026-10-16 12:00 UTC),
            get_timezone("Etc/UTC").unwrap(),
        );
        let working_set = WorkingSet::from_expenses(october, Vec::new());
        let total = MonthlyTotal {
            month: october,
            total: Amount::ZERO,
        };

        let html = Html::parse_fragment(&expense_panel_view(&working_set, &total).into_string());

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("October: ₹0.00"));
        assert!(text.contains("No expenses in October 2026 yet."));
    }
}
