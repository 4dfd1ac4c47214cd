//! Database initialization for the application's SQLite schema.

use rusqlite::Connection;

use crate::{
    auth::user::create_user_table,
    group::{core::create_group_table, membership::create_membership_table},
    invite::core::create_invitation_table,
    transaction::core::create_transaction_table,
};

/// Create the tables for the domain models if they do not already exist.
///
/// Foreign key enforcement is turned on for the connection, the schema relies
/// on it to reject memberships, transactions and invitations that reference
/// missing rows.
///
/// # Errors
/// Returns an error if any of the CREATE TABLE statements fail.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    create_user_table(connection)?;
    create_group_table(connection)?;
    create_membership_table(connection)?;
    create_transaction_table(connection)?;
    create_invitation_table(connection)?;

    Ok(())
}
