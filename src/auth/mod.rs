//! Cookie based authentication: registration, log-in, log-out, and the
//! middleware that guards routes which require a logged-in user.

pub(crate) mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod register;
pub(crate) mod user;

pub use cookie::{invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use register::{get_register_page, register_user};
pub use user::{User, UserID, get_user_by_email, get_user_by_id};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;

#[cfg(test)]
pub use middleware::AuthState;
