//! The route for creating a group.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    group::core::{GroupName, create_group},
};

/// The state needed to create a group.
#[derive(Debug, Clone)]
pub struct CreateGroupState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGroupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a group.
#[derive(Debug, Deserialize)]
pub struct CreateGroupForm {
    pub name: String,
}

/// Handler for creating a group.
///
/// The logged-in user becomes the group's admin. On success the client is
/// redirected to the new group's page.
pub async fn post_create_group(
    State(state): State<CreateGroupState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<CreateGroupForm>,
) -> Response {
    // Validate before taking the lock so an invalid name never touches the
    // database.
    let name = match GroupName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_group(&name, user_id, &mut connection) {
        Ok(group) => {
            tracing::info!("user {user_id} created group {} ({})", group.id, group.name);

            (
                StatusCode::SEE_OTHER,
                HxRedirect(format_endpoint(endpoints::GROUP_VIEW, group.id)),
                (),
            )
                .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}
