//! The profile page, showing the logged-in user's details.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{User, UserID, get_user_by_id},
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed to display the profile page.
#[derive(Debug, Clone)]
pub struct ProfileState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn profile_view(user: &User) -> Response {
    let nav_bar = NavBar::new(endpoints::PROFILE_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex flex-col items-center gap-4 py-8"
            {
                span
                    class="flex items-center justify-center w-24 h-24 rounded-full \
                    bg-blue-500 text-white text-3xl font-semibold"
                {
                    (user.initials())
                }

                h1 class="text-2xl font-bold" { (user.full_name()) }

                p class="text-gray-500 dark:text-gray-400" { (user.email) }
            }
        }
    };

    base("Profile", &content).into_response()
}

/// Display the profile page for the logged-in user.
pub async fn get_profile_page(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_user_by_id(user_id, &connection) {
        Ok(user) => profile_view(&user),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod profile_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, middleware, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        auth::{PasswordHash, user::create_user},
        db::initialize,
        endpoints,
    };

    use super::{ProfileState, get_profile_page};

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let alice = create_user(
            "alice@example.com",
            "Alice",
            "Adams",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap()
        .id;

        let state = ProfileState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let app = Router::new()
            .route(endpoints::PROFILE_VIEW, get(get_profile_page))
            .layer(middleware::from_fn(
                move |mut request: axum::extract::Request, next: axum::middleware::Next| {
                    request.extensions_mut().insert(alice);
                    async move { next.run(request).await }
                },
            ))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn profile_shows_initials_name_and_email() {
        let server = get_test_server();

        let response = server.get(endpoints::PROFILE_VIEW).await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("AA"));
        assert!(text.contains("Alice Adams"));
        assert!(text.contains("alice@example.com"));
    }
}
