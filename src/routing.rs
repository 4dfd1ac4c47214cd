//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in, register_user},
    dashboard::get_dashboard_page,
    endpoints,
    group::{get_group_page, get_new_group_page, post_create_group},
    internal_server_error::get_internal_server_error_page,
    invite::{get_join_group_page, post_create_invite, post_send_sms_invites},
    not_found::get_404_not_found,
    profile::get_profile_page,
    transaction::{post_create_transaction, post_settle},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::NEW_GROUP_VIEW, get(get_new_group_page))
        .route(endpoints::GROUP_VIEW, get(get_group_page))
        .route(endpoints::JOIN_GROUP_VIEW, get(get_join_group_page))
        .route(endpoints::PROFILE_VIEW, get(get_profile_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST routes need to use the HX-Redirect header for auth redirects
    // to work properly for htmx requests.
    let protected_api_routes = Router::new()
        .route(endpoints::GROUPS_API, post(post_create_group))
        .route(endpoints::TRANSACTIONS_API, post(post_create_transaction))
        .route(endpoints::SETTLE_API, post(post_settle))
        .route(endpoints::INVITES_API, post(post_create_invite))
        .route(endpoints::SMS_INVITES_API, post(post_send_sms_invites))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx));

    protected_page_routes
        .merge(protected_api_routes)
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod routing_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, endpoints};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(connection, "shhh", "https://ponyup.test", None).unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn root_redirects_unauthenticated_clients_to_log_in() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_see_other();
        assert!(
            response
                .header("location")
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW)
        );
    }

    #[tokio::test]
    async fn log_in_page_is_reachable_without_auth() {
        let server = get_test_server();

        server.get(endpoints::LOG_IN_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn register_page_is_reachable_without_auth() {
        let server = get_test_server();

        server.get(endpoints::REGISTER_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn unknown_route_renders_not_found_page() {
        let server = get_test_server();

        server.get("/no-such-page").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn full_register_create_group_flow() {
        let server = get_test_server();

        let register_response = server
            .post(endpoints::USERS)
            .form(&[
                ("email", "alice@example.com"),
                ("first_name", "Alice"),
                ("last_name", "Adams"),
                ("password", "averygoodsecret42"),
            ])
            .await;
        register_response.assert_status_see_other();
        let auth_cookie = register_response.cookie(crate::auth::COOKIE_TOKEN);

        let create_response = server
            .post(endpoints::GROUPS_API)
            .add_cookie(auth_cookie.clone())
            .form(&[("name", "Ski Trip")])
            .await;
        create_response.assert_status_see_other();

        let group_url = create_response.header("hx-redirect");
        let group_page = server
            .get(group_url.to_str().unwrap())
            .add_cookie(auth_cookie)
            .await;
        group_page.assert_status_ok();
        assert!(group_page.text().contains("Ski Trip"));
    }
}
