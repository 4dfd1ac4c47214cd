//! Routes for creating invite links and sending them by SMS.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::UserID,
    group::{GroupID, membership::is_member},
    html::FORM_TEXT_INPUT_STYLE,
    invite::{
        core::{build_invite_link, create_invitation},
        sms::SmsSender,
    },
};

/// The state needed to create an invite link.
#[derive(Debug, Clone)]
pub struct CreateInviteState {
    pub base_url: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateInviteState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            base_url: state.base_url.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handler for creating a shareable invite link for a group.
///
/// Responds with an HTML fragment containing the link, which htmx swaps into
/// the invite section of the group page.
pub async fn post_create_invite(
    State(state): State<CreateInviteState>,
    Extension(user_id): Extension<UserID>,
    Path(group_id): Path<i64>,
) -> Response {
    let group_id = GroupID::new(group_id);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match is_member(user_id, group_id, &connection) {
        Ok(true) => {}
        Ok(false) => return Error::NotAMember.into_alert_response(),
        Err(error) => return error.into_alert_response(),
    }

    let invitation = match create_invitation(group_id, user_id, &connection) {
        Ok(invitation) => invitation,
        Err(error) => return error.into_alert_response(),
    };

    let invite_link = build_invite_link(&state.base_url, &invitation.token);

    html! {
        p class="text-sm text-gray-500 dark:text-gray-400 mb-2"
        {
            "Anyone with this link can join the group:"
        }

        input
            type="text"
            value=(invite_link)
            readonly
            onclick="this.select()"
            class=(FORM_TEXT_INPUT_STYLE);
    }
    .into_response()
}

/// The state needed to send SMS invites.
#[derive(Debug, Clone)]
pub struct SmsInviteState {
    pub base_url: String,
    pub sms_sender: Option<SmsSender>,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SmsInviteState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            base_url: state.base_url.clone(),
            sms_sender: state.sms_sender.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for sending SMS invites.
#[derive(Debug, Deserialize)]
pub struct SmsInviteForm {
    /// Comma separated phone numbers.
    pub phone_numbers: String,
}

/// Handler for sending invite links by SMS.
///
/// Each phone number gets its own invitation record, persisted before the
/// message is sent so a delivery failure never loses a link that may already
/// be on its way.
pub async fn post_send_sms_invites(
    State(state): State<SmsInviteState>,
    Extension(user_id): Extension<UserID>,
    Path(group_id): Path<i64>,
    Form(form): Form<SmsInviteForm>,
) -> Response {
    let group_id = GroupID::new(group_id);

    let Some(sms_sender) = state.sms_sender else {
        return Error::SmsNotConfigured.into_alert_response();
    };

    let recipients: Vec<&str> = form
        .phone_numbers
        .split(',')
        .map(str::trim)
        .filter(|number| !number.is_empty())
        .collect();

    if recipients.is_empty() {
        return Alert::Error {
            message: "No phone numbers".to_owned(),
            details: "Enter at least one phone number, separated by commas.".to_owned(),
        }
        .into_response();
    }

    // The invitations are all persisted before the first send so the database
    // lock is not held across an await point.
    let invite_links = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        match is_member(user_id, group_id, &connection) {
            Ok(true) => {}
            Ok(false) => return Error::NotAMember.into_alert_response(),
            Err(error) => return error.into_alert_response(),
        }

        let mut invite_links = Vec::with_capacity(recipients.len());
        for recipient in &recipients {
            match create_invitation(group_id, user_id, &connection) {
                Ok(invitation) => invite_links.push((
                    (*recipient).to_owned(),
                    build_invite_link(&state.base_url, &invitation.token),
                )),
                Err(error) => return error.into_alert_response(),
            }
        }

        invite_links
    };

    for (recipient, invite_link) in &invite_links {
        let message = format!("You've been invited to split expenses on PonyUp! Join here: {invite_link}");

        if let Err(error) = sms_sender.send(recipient, &message).await {
            return error.into_alert_response();
        }
    }

    let count = invite_links.len();
    let message = if count == 1 {
        "Invite sent!".to_owned()
    } else {
        format!("{count} invites sent!")
    };

    Alert::SuccessSimple { message }.into_response()
}
