//! The group type, the validated group name, and database access for groups.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    Error,
    auth::UserID,
    group::membership::{Role, create_membership},
};

/// A newtype wrapper for integer group IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct GroupID(i64);

impl GroupID {
    /// Create a new group ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the group ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for GroupID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A validated group name.
///
/// Group names must be at least two grapheme clusters long after trimming
/// surrounding whitespace, so a single character (or a single emoji) is not a
/// valid name but "Ski Trip" and "麻雀" are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupName(String);

impl GroupName {
    /// Create and validate a group name from a string.
    ///
    /// # Errors
    ///
    /// Returns an [Error::GroupNameTooShort] if the trimmed name is shorter
    /// than two grapheme clusters.
    pub fn new(raw_name: &str) -> Result<Self, Error> {
        let trimmed = raw_name.trim();

        if trimmed.graphemes(true).count() < 2 {
            return Err(Error::GroupNameTooShort);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Create a new `GroupName` without any validation.
    ///
    /// The caller should ensure that `raw_name` is a valid group name.
    pub fn new_unchecked(raw_name: &str) -> Self {
        Self(raw_name.to_owned())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for GroupName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shared expense context with members and transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: GroupID,
    pub name: String,
    /// The user who created the group and holds the admin role.
    pub created_by: UserID,
}

/// Create the group table.
///
/// The table is named `app_group` because `group` is a reserved word in SQL.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_group_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS app_group (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            created_by INTEGER NOT NULL REFERENCES user(id)
        )",
        (),
    )?;

    Ok(())
}

/// Create a group and the creator's admin membership in one SQL transaction.
///
/// Committing both rows together means a failure cannot leave behind a group
/// that has no admin.
///
/// # Errors
///
/// This function will return an error if there was an error trying to access
/// the database. No rows are written on error.
pub fn create_group(
    name: &GroupName,
    created_by: UserID,
    connection: &mut Connection,
) -> Result<Group, Error> {
    let tx = connection.transaction().map_err(Error::from)?;

    tx.execute(
        "INSERT INTO app_group (name, created_by) VALUES (?1, ?2)",
        (name.as_str(), created_by.as_i64()),
    )?;
    let id = GroupID::new(tx.last_insert_rowid());

    create_membership(created_by, id, Role::Admin, &tx)?;

    tx.commit().map_err(Error::from)?;

    Ok(Group {
        id,
        name: name.as_str().to_owned(),
        created_by,
    })
}

/// Get the group from the database with an ID equal to `group_id`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `group_id` does not belong to a group, or
/// an [Error::SqlError] if there was an error trying to access the database.
pub fn get_group(group_id: GroupID, connection: &Connection) -> Result<Group, Error> {
    connection
        .prepare("SELECT id, name, created_by FROM app_group WHERE id = :id")?
        .query_row(&[(":id", &group_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the groups that `user_id` is a member of, oldest first.
///
/// # Errors
///
/// This function will return an error if there was an error trying to access
/// the database.
pub fn get_groups_for_user(user_id: UserID, connection: &Connection) -> Result<Vec<Group>, Error> {
    connection
        .prepare(
            "SELECT g.id, g.name, g.created_by
            FROM app_group g
            INNER JOIN membership m ON m.group_id = g.id
            WHERE m.user_id = :user_id
            ORDER BY g.id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_group| maybe_group.map_err(Error::from))
        .collect()
}

fn map_row(row: &Row) -> Result<Group, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let raw_created_by = row.get(2)?;

    Ok(Group {
        id: GroupID::new(raw_id),
        name: row.get(1)?,
        created_by: UserID::new(raw_created_by),
    })
}


#[cfg(test)]
mod group_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::{PasswordHash, UserID, user::create_user},
        db::initialize,
        group::membership::{Role, get_members},
    };

    use super::{GroupID, GroupName, create_group, get_group, get_groups_for_user};

    fn get_db_connection() -> Connection {
        let connection =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        connection
    }

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

    #[test]
    fn create_group_inserts_group_and_admin_membership() {
        let mut connection = get_db_connection();
        let creator = insert_test_user(&connection, "mitch@example.com");
        let name = GroupName::new("Ski Trip").unwrap();

        let group = create_group(&name, creator, &mut connection).unwrap();

        assert_eq!(group.name, "Ski Trip");
        assert_eq!(group.created_by, creator);

        let members = get_members(group.id, &connection).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user.id, creator);
        assert_eq!(members[0].role, Role::Admin);
    }

    #[test]
    fn create_group_writes_exactly_one_group_row() {
        let mut connection = get_db_connection();
        let creator = insert_test_user(&connection, "mitch@example.com");
        let name = GroupName::new("Ski Trip").unwrap();

        create_group(&name, creator, &mut connection).unwrap();

        let group_count: i64 = connection
            .query_row("SELECT COUNT(*) FROM app_group", [], |row| row.get(0))
            .unwrap();
        assert_eq!(group_count, 1);
    }

    #[test]
    fn get_group_fails_with_non_existent_id() {
        let connection = get_db_connection();

        let result = get_group(GroupID::new(42), &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_groups_for_user_only_returns_their_groups() {
        let mut connection = get_db_connection();
        let alice = insert_test_user(&connection, "alice@example.com");
        let bob = insert_test_user(&connection, "bob@example.com");

        let alice_group =
            create_group(&GroupName::new("Flat").unwrap(), alice, &mut connection).unwrap();
        create_group(&GroupName::new("Road Trip").unwrap(), bob, &mut connection).unwrap();

        let groups = get_groups_for_user(alice, &connection).unwrap();

        assert_eq!(groups, vec![alice_group]);
    }
}
