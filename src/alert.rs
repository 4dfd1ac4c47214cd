//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts are rendered as HTML fragments that htmx swaps into the
//! `#alert-container` element on the current page.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A message displayed to the user at the top of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Something went wrong. `details` should tell the user what to do next.
    Error { message: String, details: String },
    /// Something succeeded and there is nothing more to say about it.
    SuccessSimple { message: String },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        match self {
            Alert::Error { message, details } => html! {
                div
                    class="p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                    dark:bg-gray-800 dark:text-red-400"
                    role="alert"
                {
                    span class="font-medium" { (message) }
                    " "
                    (details)
                }
            },
            Alert::SuccessSimple { message } => html! {
                div
                    class="p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
                    dark:bg-gray-800 dark:text-green-400"
                    role="alert"
                {
                    span class="font-medium" { (message) }
                }
            },
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod alert_tests {
    use super::Alert;

    #[test]
    fn error_alert_contains_message_and_details() {
        let markup = Alert::Error {
            message: "Not found".to_owned(),
            details: "Ask for a new invite link.".to_owned(),
        }
        .into_html()
        .into_string();

        assert!(markup.contains("Not found"));
        assert!(markup.contains("Ask for a new invite link."));
    }

    #[test]
    fn success_alert_contains_message() {
        let markup = Alert::SuccessSimple {
            message: "Invites sent!".to_owned(),
        }
        .into_html()
        .into_string();

        assert!(markup.contains("Invites sent!"));
    }
}
