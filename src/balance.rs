//! Ledger aggregation: the viewer's running balance for a group and the
//! per-counterparty totals behind the "pony up" tiles.
//!
//! Both functions are pure and recomputed from a fresh transaction list on
//! every page load, nothing is cached.

use std::collections::HashMap;

use crate::{
    auth::UserID,
    transaction::{Transaction, TransactionKind, TransactionStatus},
};

/// The total amount the viewer owes one other member across the group's
/// pending transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterpartyTotal {
    /// The member who is owed the money.
    pub paid_by: UserID,
    pub total: f64,
}

/// Compute the signed balance over `transactions`.
///
/// A `pay` subtracts its amount from the running total and a `charge` adds it.
/// Negative means the viewing user owes money overall, non-negative means they
/// are owed. An empty list yields 0.
pub fn balance(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .fold(0.0, |total, transaction| match transaction.kind {
            TransactionKind::Pay => total - transaction.amount,
            TransactionKind::Charge => total + transaction.amount,
        })
}

/// Total the pending transactions that `viewer` owes, grouped by the member
/// owed.
///
/// Only transactions with `owed_by == viewer` and status pending contribute.
/// The result is sorted by counterparty ID so the tiles render in a stable
/// order.
pub fn pending_totals(transactions: &[Transaction], viewer: UserID) -> Vec<CounterpartyTotal> {
    let mut totals: HashMap<UserID, f64> = HashMap::new();

    for transaction in transactions {
        if transaction.owed_by != viewer || transaction.status != TransactionStatus::Pending {
            continue;
        }

        *totals.entry(transaction.paid_by).or_insert(0.0) += transaction.amount;
    }

    let mut totals: Vec<CounterpartyTotal> = totals
        .into_iter()
        .map(|(paid_by, total)| CounterpartyTotal { paid_by, total })
        .collect();
    totals.sort_by_key(|counterparty_total| counterparty_total.paid_by.as_i64());

    totals
}
