//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/groups/{group_id}', use [format_endpoint].

use std::fmt::Display;

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users, listing their groups.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for creating a new group.
pub const NEW_GROUP_VIEW: &str = "/groups/new";
/// The page showing a group's balance, members and transactions.
pub const GROUP_VIEW: &str = "/groups/{group_id}";
/// The page that redeems an invite token and joins the current user to a group.
pub const JOIN_GROUP_VIEW: &str = "/join-group/{token}";
/// The page showing the logged-in user's details.
pub const PROFILE_VIEW: &str = "/profile";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to register a user.
pub const USERS: &str = "/api/users";
/// The route to create a group.
pub const GROUPS_API: &str = "/api/groups";
/// The route to create an invite link for a group.
pub const INVITES_API: &str = "/api/groups/{group_id}/invites";
/// The route to send SMS invites for a group.
pub const SMS_INVITES_API: &str = "/api/groups/{group_id}/invites/sms";
/// The route to record a pay or charge transaction in a group.
pub const TRANSACTIONS_API: &str = "/api/groups/{group_id}/transactions";
/// The route to settle all pending transactions the current user owes to
/// another member of a group.
pub const SETTLE_API: &str = "/api/groups/{group_id}/settle/{user_id}";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/groups/{group_id}', '{group_id}' is the
/// parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters.
/// Paths with more than one parameter can be formatted by repeated calls,
/// parameters are filled left to right.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if param_start.is_none() && c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_GROUP_VIEW);
        assert_endpoint_is_valid_uri(endpoints::GROUP_VIEW);
        assert_endpoint_is_valid_uri(endpoints::JOIN_GROUP_VIEW);
        assert_endpoint_is_valid_uri(endpoints::PROFILE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REGISTER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);

        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::USERS);
        assert_endpoint_is_valid_uri(endpoints::GROUPS_API);
        assert_endpoint_is_valid_uri(endpoints::INVITES_API);
        assert_endpoint_is_valid_uri(endpoints::SMS_INVITES_API);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_API);
        assert_endpoint_is_valid_uri(endpoints::SETTLE_API);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn formats_string_parameters() {
        let formatted_path = format_endpoint("/join-group/{token}", "deadbeef");

        assert_eq!(formatted_path, "/join-group/deadbeef");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn fills_parameters_left_to_right() {
        let formatted_path = format_endpoint("/groups/{group_id}/settle/{user_id}", 7);

        assert_eq!(formatted_path, "/groups/7/settle/{user_id}");

        let formatted_path = format_endpoint(&formatted_path, 42);

        assert_eq!(formatted_path, "/groups/7/settle/42");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
