//! The dashboard page, listing the logged-in user's groups.

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
    auth::UserID,
    endpoints::{self, format_endpoint},
    group::{Group, get_groups_for_user, membership::count_members},
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed to display the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn dashboard_view(groups: &[(Group, i64)]) -> Response {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-xl"
            {
                h1 class="text-2xl font-bold py-4" { "Your groups" }

                @if groups.is_empty() {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "You are not in any groups yet. "

                        a href=(endpoints::NEW_GROUP_VIEW) class=(LINK_STYLE)
                        {
                            "Create one"
                        }

                        " or ask a friend for an invite link."
                    }
                }

                ul class="space-y-2"
                {
                    @for (group, member_count) in groups {
                        @let group_url = format_endpoint(endpoints::GROUP_VIEW, group.id);
                        @let member_label = if *member_count == 1 { "member" } else { "members" };

                        li
                        {
                            a
                                href=(group_url)
                                class="block p-4 rounded border border-gray-200 \
                                dark:border-gray-700 hover:bg-gray-100 dark:hover:bg-gray-800"
                            {
                                span class="font-semibold" { (group.name) }

                                span class="block text-sm text-gray-500 dark:text-gray-400"
                                {
                                    (member_count) " " (member_label)
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Groups", &content).into_response()
}

/// Display the dashboard page with the user's groups.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let result: Result<Vec<(Group, i64)>, Error> =
        get_groups_for_user(user_id, &connection).and_then(|groups| {
            groups
                .into_iter()
                .map(|group| {
                    let member_count = count_members(group.id, &connection)?;
                    Ok((group, member_count))
                })
                .collect()
        });

    match result {
        Ok(groups) => dashboard_view(&groups),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod dashboard_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, middleware, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        auth::{PasswordHash, UserID, user::create_user},
        db::initialize,
        endpoints::{self, format_endpoint},
        group::{GroupName, create_group},
    };

    use super::{DashboardState, get_dashboard_page};

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

    fn get_test_server(with_groups: bool) -> (TestServer, Vec<String>) {
        let mut connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let alice = insert_test_user(&connection, "alice@example.com");
        let mut group_urls = Vec::new();

        if with_groups {
            for name in ["Flat", "Road Trip"] {
                let group =
                    create_group(&GroupName::new(name).unwrap(), alice, &mut connection).unwrap();
                group_urls.push(format_endpoint(endpoints::GROUP_VIEW, group.id));
            }
        }

        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let app = Router::new()
            .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
            .layer(middleware::from_fn(
                move |mut request: axum::extract::Request, next: axum::middleware::Next| {
                    request.extensions_mut().insert(alice);
                    async move { next.run(request).await }
                },
            ))
            .with_state(state);

        (
            TestServer::try_new(app).expect("Could not create test server."),
            group_urls,
        )
    }

    #[tokio::test]
    async fn dashboard_lists_groups_with_links() {
        let (server, group_urls) = get_test_server(true);

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        let text = response.text();
        let html = Html::parse_document(&text);

        let selector = Selector::parse("a").unwrap();
        let hrefs: Vec<&str> = html
            .select(&selector)
            .filter_map(|a| a.value().attr("href"))
            .collect();

        for group_url in &group_urls {
            assert!(hrefs.contains(&group_url.as_str()), "missing link {group_url}");
        }

        assert!(text.contains("Flat"));
        assert!(text.contains("Road Trip"));
        assert!(text.contains("1 member"));
    }

    #[tokio::test]
    async fn dashboard_with_no_groups_suggests_creating_one() {
        let (server, _) = get_test_server(false);

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        assert!(response.text().contains("not in any groups yet"));
    }
}
