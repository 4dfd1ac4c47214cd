//! Invite links, the join flow, and SMS delivery.

pub(crate) mod core;
mod create_endpoint;
mod join_page;
pub(crate) mod sms;

pub use core::{Invitation, JoinOutcome, build_invite_link, create_invitation, redeem_invitation};
pub use create_endpoint::{post_create_invite, post_send_sms_invites};
pub use join_page::get_join_group_page;
pub use sms::{SmsConfig, SmsSender};
