//! The page that redeems an invite token and joins the current user to a
//! group.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    group::Group,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    invite::core::{JoinOutcome, redeem_invitation},
    navigation::NavBar,
};

/// The state needed to redeem an invitation.
#[derive(Debug, Clone)]
pub struct JoinGroupState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for JoinGroupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn join_outcome_view(group: &Group, message: &str) -> Response {
    let nav_bar = NavBar::new("").into_html();
    let group_url = format_endpoint(endpoints::GROUP_VIEW, group.id);

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold py-4" { (message) }

            a href=(group_url) class=(LINK_STYLE) { "Go to " (group.name) }
        }
    };

    base(&group.name, &content).into_response()
}

/// Display the page that redeems an invite token.
///
/// An unknown token renders the not found page and writes nothing. Visiting
/// with an existing membership is reported, not treated as an error.
pub async fn get_join_group_page(
    State(state): State<JoinGroupState>,
    Extension(user_id): Extension<UserID>,
    Path(token): Path<String>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match redeem_invitation(&token, user_id, &connection) {
        Ok(JoinOutcome::Joined(group)) => {
            tracing::info!("user {user_id} joined group {} via invite", group.id);
            join_outcome_view(&group, &format!("Welcome to {}!", group.name))
        }
        Ok(JoinOutcome::AlreadyMember(group)) => join_outcome_view(
            &group,
            &format!("You are already a member of {}.", group.name),
        ),
        Err(error) => error.into_response(),
    }
}
