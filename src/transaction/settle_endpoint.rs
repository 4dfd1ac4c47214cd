//! The route for settling ("ponying up") everything the logged-in user owes
//! another member of a group.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    group::{GroupID, membership::is_member},
    transaction::core::settle_transactions,
};

/// The state needed to settle transactions.
#[derive(Debug, Clone)]
pub struct SettleState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettleState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handler for settling all pending transactions the logged-in user owes to
/// the member identified by the `user_id` path parameter.
///
/// On success the client is redirected back to the group page. Settling when
/// nothing is owed is a no-op, not an error.
pub async fn post_settle(
    State(state): State<SettleState>,
    Extension(user_id): Extension<UserID>,
    Path((group_id, counterparty_id)): Path<(i64, i64)>,
) -> Response {
    let group_id = GroupID::new(group_id);
    let counterparty = UserID::new(counterparty_id);

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

    match settle_transactions(group_id, user_id, counterparty, &connection) {
        Ok(settled) => {
            tracing::info!(
                "user {user_id} settled {settled} transaction(s) owed to user \
                {counterparty} in group {group_id}"
            );

            (
                StatusCode::SEE_OTHER,
                HxRedirect(format_endpoint(endpoints::GROUP_VIEW, group_id)),
                (),
            )
                .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod settle_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, middleware, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        auth::{PasswordHash, UserID, user::create_user},
        db::initialize,
        endpoints::{self, format_endpoint},
        group::{
            GroupID, GroupName, create_group,
            membership::{Role, create_membership},
        },
        transaction::core::{
            TransactionKind, TransactionStatus, create_transaction, get_transactions_for_group,
        },
    };

    use super::{SettleState, post_settle};

    fn insert_test_user(connection: &Connection, email: &str) -> UserID {
        create_user(
            email,
            "Test",
            "User",
            PasswordHash::new_unchecked("hunter2"),
            connection,
        )
        .unwrap()
        .id
    }

    /// A server authenticated as bob, who owes alice within the group.
    fn get_test_server() -> (TestServer, Arc<Mutex<Connection>>, GroupID, UserID, UserID) {
        let mut connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let alice = insert_test_user(&connection, "alice@example.com");
        let bob = insert_test_user(&connection, "bob@example.com");
        let group = create_group(&GroupName::new("Flat").unwrap(), alice, &mut connection).unwrap();
        create_membership(bob, group.id, Role::Member, &connection).unwrap();

        create_transaction(
            group.id,
            alice,
            bob,
            5.0,
            "Lunch",
            TransactionKind::Charge,
            &connection,
        )
        .unwrap();
        create_transaction(
            group.id,
            bob,
            alice,
            3.0,
            "Coffee",
            TransactionKind::Charge,
            &connection,
        )
        .unwrap();

        let db_connection = Arc::new(Mutex::new(connection));
        let state = SettleState {
            db_connection: db_connection.clone(),
        };

        let app = Router::new()
            .route(endpoints::SETTLE_API, post(post_settle))
            .layer(middleware::from_fn(
                move |mut request: axum::extract::Request, next: axum::middleware::Next| {
                    request.extensions_mut().insert(bob);
                    async move { next.run(request).await }
                },
            ))
            .with_state(state);

        (
            TestServer::try_new(app).expect("Could not create test server."),
            db_connection,
            group.id,
            alice,
            bob,
        )
    }

    #[tokio::test]
    async fn settle_marks_owed_transactions_as_paid() {
        let (server, db_connection, group_id, alice, bob) = get_test_server();

        let settle_url = format_endpoint(
            &format_endpoint(endpoints::SETTLE_API, group_id),
            alice.as_i64(),
        );
        let response = server.post(&settle_url).await;

        response.assert_status_see_other();

        let connection = db_connection.lock().unwrap();
        let transactions = get_transactions_for_group(group_id, &connection).unwrap();
        for transaction in transactions {
            if transaction.owed_by == bob {
                assert_eq!(transaction.status, TransactionStatus::Paid);
            } else {
                // What alice owes bob is untouched.
                assert_eq!(transaction.status, TransactionStatus::Pending);
            }
        }
    }
}
