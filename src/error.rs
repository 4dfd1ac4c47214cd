//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an email/password combination that does not match a
    /// registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Either the auth cookie or expiry cookie is missing from the cookie jar
    /// in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The cookie expiry date time could not be computed, formatted or parsed.
    #[error("could not compute or format a cookie expiry date")]
    DateError,

    /// An error occurred while serializing a struct as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email used to register an account is already taken.
    #[error("the email \"{0}\" is already registered")]
    DuplicateEmail(String),

    /// A group name with fewer than two characters was used to create a group.
    #[error("group names must be at least two characters long")]
    GroupNameTooShort,

    /// A transaction was created with a zero or negative amount.
    ///
    /// The direction of a transaction comes from its kind (pay or charge), so
    /// stored amounts must always be positive.
    #[error("transaction amounts must be greater than zero, got {0}")]
    NonPositiveAmount(f64),

    /// The email entered for the other party of a transaction does not belong
    /// to a registered user.
    ///
    /// The transaction must not be recorded, otherwise it would have no valid
    /// ower.
    #[error("no registered user with the email \"{0}\"")]
    RecipientNotFound(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID or invite token) are correct and that the resource has been
    /// created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The logged-in user is not a member of the group they tried to view or
    /// modify.
    #[error("the current user is not a member of this group")]
    NotAMember,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// SMS invites were requested but the server has no messaging credentials
    /// configured.
    #[error("SMS sending is not configured on this server")]
    SmsNotConfigured,

    /// The messaging API rejected a request or could not be reached.
    #[error("could not send SMS: {0}")]
    SmsFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail(String::new())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::NotAMember => NotFoundError.into_response(),
            Error::SmsNotConfigured => InternalServerError::sms_unavailable().into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::GroupNameTooShort => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid group name".to_owned(),
                    details: "Group names must be at least two characters long.".to_owned(),
                },
            ),
            Error::NonPositiveAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: format!("{amount} is not a valid amount. Enter an amount above zero."),
                },
            ),
            Error::RecipientNotFound(email) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Recipient not found".to_owned(),
                    details: format!(
                        "No one with the email {email} has signed up. \
                        Check the spelling, or invite them to the group first."
                    ),
                },
            ),
            Error::NotAMember => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not a member".to_owned(),
                    details: "You are not a member of this group.".to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "The group or invite could not be found. \
                    Try refreshing the page, or ask for a new invite link."
                        .to_owned(),
                },
            ),
            Error::SmsNotConfigured => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "SMS invites unavailable".to_owned(),
                    details: "This server has no messaging credentials configured. \
                    Share the invite link instead."
                        .to_owned(),
                },
            ),
            Error::SmsFailed(reason) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Could not send SMS".to_owned(),
                    details: format!("The messaging service rejected the request: {reason}"),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
