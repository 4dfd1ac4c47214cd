//! This file defines the registration page and the route for creating users.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        PasswordHash,
        cookie::{invalidate_auth_cookie, set_auth_cookie},
        user::create_user,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        loading_spinner,
    },
};

/// The state needed to register a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The form data for registering a new user.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

struct FormValues<'a> {
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
}

const EMPTY_FORM: FormValues = FormValues {
    email: "",
    first_name: "",
    last_name: "",
};

fn register_form_view(values: &FormValues, error_message: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            div class="flex gap-4"
            {
                div class="grow"
                {
                    label for="first_name" class=(FORM_LABEL_STYLE) { "First name" }

                    input
                        id="first_name"
                        type="text"
                        name="first_name"
                        placeholder="Mitch"
                        value=(values.first_name)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="grow"
                {
                    label for="last_name" class=(FORM_LABEL_STYLE) { "Last name" }

                    input
                        id="last_name"
                        type="text"
                        name="last_name"
                        placeholder="Heidbrink"
                        value=(values.last_name)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "Email" }

                input
                    id="email"
                    type="email"
                    name="email"
                    placeholder="you@example.com"
                    value=(values.email)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="password" class=(FORM_LABEL_STYLE) { "Password" }

                input
                    id="password"
                    type="password"
                    name="password"
                    placeholder="••••••••"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400" { (error_message) }
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" { (loading_spinner()) }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a
                    href=(endpoints::LOG_IN_VIEW)
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 \
                    dark:text-blue-500 dark:hover:text-blue-400"
                {
                    "Log in here"
                }
            }
        }
    }
}

fn register_view(values: &FormValues, error_message: &str) -> Markup {
    let form = register_form_view(values, error_message);

    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold leading-tight tracking-tight md:text-2xl py-4"
            {
                "Create an account"
            }

            (form)
        }
    };

    base("Register", &content)
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    register_view(&EMPTY_FORM, "").into_response()
}

/// Handler for registering a new user.
///
/// On success, the new user is logged in straight away and redirected to the
/// dashboard page. Otherwise, the form is returned with an error message
/// explaining the problem.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let values = FormValues {
        email: &form.email,
        first_name: &form.first_name,
        last_name: &form.last_name,
    };

    if form.first_name.trim().is_empty() || form.last_name.trim().is_empty() {
        return register_form_view(&values, "Please enter your first and last name.")
            .into_response();
    }

    let password_hash = match PasswordHash::from_raw_password(&form.password, PasswordHash::DEFAULT_COST) {
        Ok(password_hash) => password_hash,
        Err(Error::TooWeak(feedback)) => {
            let error_message = format!("That password is too weak. {feedback}");
            return register_form_view(&values, &error_message).into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while hashing password: {error}");
            return error.into_alert_response();
        }
    };

    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        match create_user(
            form.email.trim(),
            form.first_name.trim(),
            form.last_name.trim(),
            password_hash,
            &connection,
        ) {
            Ok(user) => user,
            Err(Error::DuplicateEmail(email)) => {
                let error_message = format!("The email address {email} is already in use.");
                return register_form_view(&values, &error_message).into_response();
            }
            Err(error) => {
                tracing::error!("Unhandled error while creating user: {error}");
                return error.into_alert_response();
            }
        }
    };

    match set_auth_cookie(jar.clone(), user.id, state.cookie_duration) {
        Ok(updated_jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            updated_jar,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Error setting auth cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
                .into_response()
        }
    }
}
