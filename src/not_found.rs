//! Defines the template and route handler for the 404 not found page.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// An error response for a resource that does not exist, rendered as a full
/// 404 page.
pub struct NotFoundError;

impl IntoResponse for NotFoundError {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            error_view(
                "Not Found",
                "404",
                "We can't find that page.",
                "Check the URL, or head back to your groups.",
            ),
        )
            .into_response()
    }
}

/// The fallback route handler for URLs that match no route.
pub async fn get_404_not_found() -> Response {
    NotFoundError.into_response()
}
