//! Alert fragments for displaying error messages to users.
//!
//! Alerts are returned in place of the expense panel when a request fails and
//! are shown in the `#alert-container` element by `static/app.js`.

use axum::response::Html;
use maud::{Markup, html};

/// An alert message and the details shown underneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// An error message with details.
    Error {
        /// A short summary of what went wrong.
        message: String,
        /// How the user can fix the problem. May be empty.
        details: String,
    },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Html<String> {
        Html(self.view().into_string())
    }

    fn view(&self) -> Markup {
        let Alert::Error { message, details } = self;

        html! {
            div role="alert" class=(ERROR_STYLE)
            {
                p class="font-medium" { (message) }

                @if !details.is_empty() {
                    p class="text-sm" { (details) }
                }

                button
                    type="button"
                    data-dismiss-alert
                    class="absolute top-2 right-3 text-lg leading-none"
                    aria-label="Close"
                {
                    "×"
                }
            }
        }
    }
}

const ERROR_STYLE: &str = "relative p-4 mb-4 rounded text-red-800 bg-red-50 \
    dark:bg-gray-800 dark:text-red-400 border border-red-300 dark:border-red-800";

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_shows_message_and_details() {
        let alert = Alert::Error {
            message: "Oops".to_owned(),
            details: "Try again".to_owned(),
        };

        let html = Html::parse_fragment(&alert.into_html().0);
        let paragraphs = html
            .select(&Selector::parse("p").unwrap())
            .map(|p| p.text().collect::<String>())
            .collect::<Vec<_>>();

        assert_eq!(paragraphs, vec!["Oops", "Try again"]);
    }

    #[test]
    fn alert_without_details_has_one_paragraph() {
        let alert = Alert::Error {
            message: "Oops".to_owned(),
            details: String::new(),
        };

        let html = Html::parse_fragment(&alert.into_html().0);
        let paragraph_count = html.select(&Selector::parse("p").unwrap()).count();

        assert_eq!(paragraph_count, 1);
    }
}
