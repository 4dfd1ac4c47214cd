//! Groups, their members, and the pages for creating and viewing them.

pub(crate) mod core;
mod create_endpoint;
mod create_page;
mod detail_page;
pub(crate) mod membership;

pub use core::{Group, GroupID, GroupName, create_group, get_group, get_groups_for_user};
pub use create_endpoint::post_create_group;
pub use create_page::get_new_group_page;
pub use detail_page::get_group_page;
