//! Code for creating the membership table and managing group memberships.

use rusqlite::Connection;

use crate::{
    Error,
    auth::{PasswordHash, User, UserID},
    group::core::GroupID,
};

/// The role a user holds within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The group's creator.
    Admin,
    /// Joined via an invite.
    Member,
}

impl Role {
    /// The string stored in the database for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }

    fn from_db(raw_role: &str, column_index: usize) -> Result<Self, rusqlite::Error> {
        match raw_role {
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column_index,
                rusqlite::types::Type::Text,
                format!("invalid role \"{other}\"").into(),
            )),
        }
    }
}

/// A user's membership of a group, joined with their user record for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub user: User,
    pub role: Role,
}

/// Create the membership table.
///
/// The UNIQUE constraint on (user_id, group_id) means a user can be a member
/// of a group at most once.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_membership_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS membership (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id),
            group_id INTEGER NOT NULL REFERENCES app_group(id),
            role TEXT NOT NULL,
            UNIQUE(user_id, group_id)
        );

        CREATE INDEX IF NOT EXISTS idx_membership_group ON membership(group_id);",
    )?;

    Ok(())
}

/// Insert a membership row for `user_id` in `group_id`.
///
/// # Errors
///
/// This function will return an error if the (user, group) pair already has a
/// membership or there was an error trying to access the database.
pub fn create_membership(
    user_id: UserID,
    group_id: GroupID,
    role: Role,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO membership (user_id, group_id, role) VALUES (?1, ?2, ?3)",
        (user_id.as_i64(), group_id.as_i64(), role.as_str()),
    )?;

    Ok(())
}

/// Check whether `user_id` is a member of `group_id`.
///
/// # Errors
///
/// This function will return an error if there was an error trying to access
/// the database.
pub fn is_member(
    user_id: UserID,
    group_id: GroupID,
    connection: &Connection,
) -> Result<bool, Error> {
    connection
        .prepare(
            "SELECT EXISTS (
                SELECT 1 FROM membership WHERE user_id = :user_id AND group_id = :group_id
            )",
        )?
        .query_row(
            &[
                (":user_id", &user_id.as_i64()),
                (":group_id", &group_id.as_i64()),
            ],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Get the members of `group_id` with their user records, in join order.
///
/// # Errors
///
/// This function will return an error if there was an error trying to access
/// the database.
pub fn get_members(group_id: GroupID, connection: &Connection) -> Result<Vec<Member>, Error> {
    connection
        .prepare(
            "SELECT u.id, u.email, u.first_name, u.last_name, u.password, m.role
            FROM membership m
            INNER JOIN user u ON u.id = m.user_id
            WHERE m.group_id = :group_id
            ORDER BY m.id ASC",
        )?
        .query_map(&[(":group_id", &group_id.as_i64())], |row| {
            let raw_id = row.get(0)?;
            let raw_password_hash: String = row.get(4)?;
            let raw_role: String = row.get(5)?;

            Ok(Member {
                user: User {
                    id: UserID::new(raw_id),
                    email: row.get(1)?,
                    first_name: row.get(2)?,
                    last_name: row.get(3)?,
                    password_hash: PasswordHash::new_unchecked(&raw_password_hash),
                },
                role: Role::from_db(&raw_role, 5)?,
            })
        })?
        .map(|maybe_member| maybe_member.map_err(Error::from))
        .collect()
}

/// Count the members of `group_id`.
///
/// # Errors
///
/// This function will return an error if there was an error trying to access
/// the database.
pub fn count_members(group_id: GroupID, connection: &Connection) -> Result<i64, Error> {
    connection
        .prepare("SELECT COUNT(*) FROM membership WHERE group_id = :group_id")?
        .query_row(&[(":group_id", &group_id.as_i64())], |row| row.get(0))
        .map_err(Error::from)
}

#[cfg(test)]
mod membership_tests {
    use rusqlite::Connection;

    use crate::{
        auth::{PasswordHash, UserID, user::create_user},
        db::initialize,
        group::core::{GroupName, create_group},
    };

    use super::{Role, count_members, create_membership, get_members, is_member};

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
    fn member_can_be_added_once() {
        let mut connection = get_db_connection();
        let alice = insert_test_user(&connection, "alice@example.com");
        let bob = insert_test_user(&connection, "bob@example.com");
        let group = create_group(&GroupName::new("Flat").unwrap(), alice, &mut connection).unwrap();

        create_membership(bob, group.id, Role::Member, &connection).unwrap();

        let result = create_membership(bob, group.id, Role::Member, &connection);

        assert!(
            result.is_err(),
            "inserting a duplicate membership should fail"
        );
        assert_eq!(count_members(group.id, &connection).unwrap(), 2);
    }

    #[test]
    fn is_member_distinguishes_members_from_non_members() {
        let mut connection = get_db_connection();
        let alice = insert_test_user(&connection, "alice@example.com");
        let bob = insert_test_user(&connection, "bob@example.com");
        let group = create_group(&GroupName::new("Flat").unwrap(), alice, &mut connection).unwrap();

        assert!(is_member(alice, group.id, &connection).unwrap());
        assert!(!is_member(bob, group.id, &connection).unwrap());
    }

    #[test]
    fn get_members_returns_users_with_roles_in_join_order() {
        let mut connection = get_db_connection();
        let alice = insert_test_user(&connection, "alice@example.com");
        let bob = insert_test_user(&connection, "bob@example.com");
        let group = create_group(&GroupName::new("Flat").unwrap(), alice, &mut connection).unwrap();
        create_membership(bob, group.id, Role::Member, &connection).unwrap();

        let members = get_members(group.id, &connection).unwrap();

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].user.id, alice);
        assert_eq!(members[0].role, Role::Admin);
        assert_eq!(members[1].user.id, bob);
        assert_eq!(members[1].role, Role::Member);
    }
}
