//! The route for recording a pay or charge transaction in a group.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::{UserID, user::get_user_by_email},
    endpoints::{self, format_endpoint},
    group::{GroupID, membership::is_member},
    transaction::core::{TransactionKind, create_transaction},
};

/// The state needed to record a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionForm {
    /// "pay" or "charge".
    pub kind: String,
    pub amount: f64,
    pub description: String,
    /// The email address of the other member.
    pub recipient_email: String,
}

/// Handler for recording a pay or charge transaction.
///
/// The logged-in user is the payer, the member identified by
/// `recipient_email` is the ower. On success the client is redirected back to
/// the group page so the balance and transaction list refresh.
pub async fn post_create_transaction(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(group_id): Path<i64>,
    Form(form): Form<CreateTransactionForm>,
) -> Response {
    let group_id = GroupID::new(group_id);

    let kind = match form.kind.as_str() {
        "pay" => TransactionKind::Pay,
        "charge" => TransactionKind::Charge,
        other => {
            tracing::warn!("Rejected transaction with unknown kind {other:?}");
            return (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction".to_owned(),
                    details: "Choose either pay or charge.".to_owned(),
                },
            )
                .into_response();
        }
    };

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

    let recipient_email = form.recipient_email.trim();
    let recipient = match get_user_by_email(recipient_email, &connection) {
        Ok(recipient) => recipient,
        Err(Error::NotFound) => {
            return Error::RecipientNotFound(recipient_email.to_owned()).into_alert_response();
        }
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = create_transaction(
        group_id,
        user_id,
        recipient.id,
        form.amount,
        form.description.trim(),
        kind,
        &connection,
    ) {
        return error.into_alert_response();
    }

    (
        StatusCode::SEE_OTHER,
        HxRedirect(format_endpoint(endpoints::GROUP_VIEW, group_id)),
        (),
    )
        .into_response()
}

#[cfg(test)]
mod create_transaction_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, middleware, routing::post};
    use axum_htmx::HX_REDIRECT;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        auth::{PasswordHash, UserID, user::create_user},
        db::initialize,
        endpoints::{self, format_endpoint},
        group::{GroupID, GroupName, create_group, membership::{Role, create_membership}},
        transaction::core::{TransactionStatus, get_transactions_for_group},
    };

    use super::{CreateTransactionState, post_create_transaction};

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

    /// A server whose requests are authenticated as alice, with bob as a
    /// fellow group member.
    fn get_test_server() -> (TestServer, Arc<Mutex<Connection>>, GroupID) {
        let mut connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let alice = insert_test_user(&connection, "alice@example.com");
        let bob = insert_test_user(&connection, "bob@example.com");
        let group = create_group(&GroupName::new("Flat").unwrap(), alice, &mut connection).unwrap();
        create_membership(bob, group.id, Role::Member, &connection).unwrap();

        let db_connection = Arc::new(Mutex::new(connection));
        let state = CreateTransactionState {
            db_connection: db_connection.clone(),
        };

        let app = Router::new()
            .route(endpoints::TRANSACTIONS_API, post(post_create_transaction))
            .layer(middleware::from_fn(
                move |mut request: axum::extract::Request, next: axum::middleware::Next| {
                    request.extensions_mut().insert(alice);
                    async move { next.run(request).await }
                },
            ))
            .with_state(state);

        (
            TestServer::try_new(app).expect("Could not create test server."),
            db_connection,
            group.id,
        )
    }

    #[tokio::test]
    async fn create_transaction_inserts_row_and_redirects() {
        let (server, db_connection, group_id) = get_test_server();

        let response = server
            .post(&format_endpoint(endpoints::TRANSACTIONS_API, group_id))
            .form(&[
                ("kind", "charge"),
                ("amount", "14.78"),
                ("description", "Groceries"),
                ("recipient_email", "bob@example.com"),
            ])
            .await;

        response.assert_status_see_other();
        assert_eq!(
            response.header(HX_REDIRECT),
            format_endpoint(endpoints::GROUP_VIEW, group_id)
        );

        let connection = db_connection.lock().unwrap();
        let transactions = get_transactions_for_group(group_id, &connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 14.78);
        assert_eq!(transactions[0].status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn create_transaction_fails_for_unknown_recipient() {
        let (server, db_connection, group_id) = get_test_server();

        let response = server
            .post(&format_endpoint(endpoints::TRANSACTIONS_API, group_id))
            .form(&[
                ("kind", "pay"),
                ("amount", "5.00"),
                ("description", "Lunch"),
                ("recipient_email", "nobody@example.com"),
            ])
            .await;

        response.assert_status_bad_request();
        assert!(response.text().contains("Recipient not found"));

        let connection = db_connection.lock().unwrap();
        assert!(
            get_transactions_for_group(group_id, &connection)
                .unwrap()
                .is_empty(),
            "no transaction should be written when the recipient is unknown"
        );
    }

    #[tokio::test]
    async fn create_transaction_rejects_non_positive_amount() {
        let (server, db_connection, group_id) = get_test_server();

        let response = server
            .post(&format_endpoint(endpoints::TRANSACTIONS_API, group_id))
            .form(&[
                ("kind", "charge"),
                ("amount", "0"),
                ("description", "Nothing"),
                ("recipient_email", "bob@example.com"),
            ])
            .await;

        response.assert_status_bad_request();

        let connection = db_connection.lock().unwrap();
        assert!(
            get_transactions_for_group(group_id, &connection)
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn create_transaction_rejects_unknown_kind() {
        let (server, _, group_id) = get_test_server();

        let response = server
            .post(&format_endpoint(endpoints::TRANSACTIONS_API, group_id))
            .form(&[
                ("kind", "gift"),
                ("amount", "5.00"),
                ("description", "Lunch"),
                ("recipient_email", "bob@example.com"),
            ])
            .await;

        response.assert_status_bad_request();
    }
}
