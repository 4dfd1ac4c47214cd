//! The 500 page, including the variant shown when invite delivery is not
//! configured on this server.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// A full-page error response for failures the user cannot fix themselves.
///
/// `fix` should still tell them what to do next, even if that is just waiting.
pub struct InternalServerError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again in a minute, or let whoever runs this server know.",
        }
    }
}

impl InternalServerError<'_> {
    /// The page shown when SMS invites are requested but the server has no
    /// messaging credentials configured.
    pub fn sms_unavailable() -> Self {
        Self {
            description: "SMS invites are not available.",
            fix: "This server has no messaging credentials configured. \
                Share the invite link instead.",
        }
    }

    pub fn into_html(self) -> Html<String> {
        Html(error_view("Internal Server Error", "500", self.description, self.fix).into_string())
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.into_html()).into_response()
    }
}

pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}
