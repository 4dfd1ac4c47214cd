//! The transaction type and database access for transactions.
//!
//! A transaction records that one member paid another (`pay`) or asked
//! another member for money (`charge`). The stored amount is always positive,
//! the direction of its contribution to a balance comes from the kind.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{Error, auth::UserID, group::GroupID};

/// Whether money moved to the other member (`pay`) or was requested from them
/// (`charge`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Pay,
    Charge,
}

impl TransactionKind {
    /// The string stored in the database for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Pay => "pay",
            TransactionKind::Charge => "charge",
        }
    }

    fn from_db(raw_kind: &str, column_index: usize) -> Result<Self, rusqlite::Error> {
        match raw_kind {
            "pay" => Ok(TransactionKind::Pay),
            "charge" => Ok(TransactionKind::Charge),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column_index,
                rusqlite::types::Type::Text,
                format!("invalid transaction kind \"{other}\"").into(),
            )),
        }
    }
}

/// Whether the ower has settled the transaction yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Paid,
}

impl TransactionStatus {
    /// The string stored in the database for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Paid => "paid",
        }
    }

    fn from_db(raw_status: &str, column_index: usize) -> Result<Self, rusqlite::Error> {
        match raw_status {
            "pending" => Ok(TransactionStatus::Pending),
            "paid" => Ok(TransactionStatus::Paid),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column_index,
                rusqlite::types::Type::Text,
                format!("invalid transaction status \"{other}\"").into(),
            )),
        }
    }
}

/// A single pay or charge record between two members of a group.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub group_id: GroupID,
    /// The member who paid (or is asking to be paid).
    pub paid_by: UserID,
    /// The member who owes the amount.
    pub owed_by: UserID,
    /// Always positive. The sign of the ledger contribution comes from `kind`.
    pub amount: f64,
    pub description: String,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub created_at: OffsetDateTime,
}

/// Create the transaction table.
///
/// The table is named `txn` because `transaction` is a reserved word in SQL.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS txn (
            id INTEGER PRIMARY KEY,
            group_id INTEGER NOT NULL REFERENCES app_group(id),
            paid_by INTEGER NOT NULL REFERENCES user(id),
            owed_by INTEGER NOT NULL REFERENCES user(id),
            amount REAL NOT NULL,
            description TEXT NOT NULL,
            kind TEXT NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_txn_group ON txn(group_id);",
    )?;

    Ok(())
}

/// Create and insert a new pending transaction.
///
/// # Errors
///
/// Returns an [Error::NonPositiveAmount] if `amount` is zero, negative, or not
/// a finite number. Nothing is written on error.
pub fn create_transaction(
    group_id: GroupID,
    paid_by: UserID,
    owed_by: UserID,
    amount: f64,
    description: &str,
    kind: TransactionKind,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::NonPositiveAmount(amount));
    }

    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO txn (group_id, paid_by, owed_by, amount, description, kind, status, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        (
            group_id.as_i64(),
            paid_by.as_i64(),
            owed_by.as_i64(),
            amount,
            description,
            kind.as_str(),
            TransactionStatus::Pending.as_str(),
            created_at,
        ),
    )?;

    Ok(Transaction {
        id: connection.last_insert_rowid(),
        group_id,
        paid_by,
        owed_by,
        amount,
        description: description.to_owned(),
        kind,
        status: TransactionStatus::Pending,
        created_at,
    })
}

/// Get all transactions for `group_id`, newest first.
///
/// # Errors
///
/// This function will return an error if there was an error trying to access
/// the database.
pub fn get_transactions_for_group(
    group_id: GroupID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, group_id, paid_by, owed_by, amount, description, kind, status, created_at
            FROM txn
            WHERE group_id = :group_id
            ORDER BY created_at DESC, id DESC",
        )?
        .query_map(&[(":group_id", &group_id.as_i64())], map_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Mark all pending transactions that `owed_by` owes to `paid_by` within
/// `group_id` as paid.
///
/// Returns the number of settled transactions. Transactions already paid, or
/// belonging to another group or pair of members, are untouched. Matching zero
/// rows is not an error.
///
/// # Errors
///
/// This function will return an error if there was an error trying to access
/// the database.
pub fn settle_transactions(
    group_id: GroupID,
    owed_by: UserID,
    paid_by: UserID,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute(
            "UPDATE txn SET status = ?1
            WHERE group_id = ?2 AND owed_by = ?3 AND paid_by = ?4 AND status = ?5",
            (
                TransactionStatus::Paid.as_str(),
                group_id.as_i64(),
                owed_by.as_i64(),
                paid_by.as_i64(),
                TransactionStatus::Pending.as_str(),
            ),
        )
        .map_err(Error::from)
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_group_id = row.get(1)?;
    let raw_paid_by = row.get(2)?;
    let raw_owed_by = row.get(3)?;
    let raw_kind: String = row.get(6)?;
    let raw_status: String = row.get(7)?;

    Ok(Transaction {
        id: row.get(0)?,
        group_id: GroupID::new(raw_group_id),
        paid_by: UserID::new(raw_paid_by),
        owed_by: UserID::new(raw_owed_by),
        amount: row.get(4)?,
        description: row.get(5)?,
        kind: TransactionKind::from_db(&raw_kind, 6)?,
        status: TransactionStatus::from_db(&raw_status, 7)?,
        created_at: row.get(8)?,
    })
}
