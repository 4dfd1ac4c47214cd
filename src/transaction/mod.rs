//! Pay and charge transactions between group members, and the settle
//! ("pony up") action.

pub(crate) mod core;
mod create_endpoint;
mod settle_endpoint;

pub use core::{
    Transaction, TransactionKind, TransactionStatus, get_transactions_for_group,
    settle_transactions,
};
pub use create_endpoint::post_create_transaction;
pub use settle_endpoint::post_settle;

#[cfg(test)]
pub use core::create_transaction;
