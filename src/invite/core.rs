//! Invitation tokens and their redemption.
//!
//! An invitation is identified by a random UUID token embedded in a
//! shareable link. Tokens have no expiry and are deliberately multi-use:
//! redeeming checks the visitor's membership, it never consumes the token, so
//! one link can admit several invitees.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    group::{Group, GroupID, get_group, membership::{Role, create_membership, is_member}},
};

/// A standing invitation to join a group.
#[derive(Debug, Clone, PartialEq)]
pub struct Invitation {
    /// The opaque token that appears in the invite link.
    pub token: String,
    pub group_id: GroupID,
    /// The member who created the invitation.
    pub invited_by: UserID,
    pub created_at: OffsetDateTime,
}

/// The result of redeeming an invitation token.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    /// The user was added to the group as a member.
    Joined(Group),
    /// The user already belonged to the group, nothing was written.
    AlreadyMember(Group),
}

/// Create the invitation table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_invitation_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS invitation (
            token TEXT PRIMARY KEY,
            group_id INTEGER NOT NULL REFERENCES app_group(id),
            invited_by INTEGER NOT NULL REFERENCES user(id),
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Create and insert an invitation for `group_id` with a fresh random token.
///
/// # Errors
///
/// This function will return an error if there was an error trying to access
/// the database.
pub fn create_invitation(
    group_id: GroupID,
    invited_by: UserID,
    connection: &Connection,
) -> Result<Invitation, Error> {
    let token = Uuid::new_v4().to_string();
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO invitation (token, group_id, invited_by, created_at)
        VALUES (?1, ?2, ?3, ?4)",
        (&token, group_id.as_i64(), invited_by.as_i64(), created_at),
    )?;

    Ok(Invitation {
        token,
        group_id,
        invited_by,
        created_at,
    })
}

/// Get the invitation with the given token.
///
/// # Errors
///
/// Returns an [Error::NotFound] if the token does not belong to an
/// invitation.
pub fn get_invitation(token: &str, connection: &Connection) -> Result<Invitation, Error> {
    connection
        .prepare(
            "SELECT token, group_id, invited_by, created_at
            FROM invitation WHERE token = :token",
        )?
        .query_row(&[(":token", &token)], map_row)
        .map_err(|error| error.into())
}

/// Redeem an invitation token for `user_id`.
///
/// If the user is not yet a member of the invitation's group, exactly one
/// membership row with the `member` role is inserted. If they already belong
/// to the group nothing is written and the outcome reports it.
///
/// # Errors
///
/// Returns an [Error::NotFound] if the token does not belong to an
/// invitation. No rows are written on error.
pub fn redeem_invitation(
    token: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<JoinOutcome, Error> {
    let invitation = get_invitation(token, connection)?;
    let group = get_group(invitation.group_id, connection)?;

    if is_member(user_id, group.id, connection)? {
        return Ok(JoinOutcome::AlreadyMember(group));
    }

    create_membership(user_id, group.id, Role::Member, connection)?;

    Ok(JoinOutcome::Joined(group))
}

/// Build the shareable invite link for `token`,
/// e.g. "https://ponyup.example.com/join-group/beefcafe".
///
/// `base_url` must not have a trailing slash.
pub fn build_invite_link(base_url: &str, token: &str) -> String {
    format!(
        "{base_url}{}",
        format_endpoint(endpoints::JOIN_GROUP_VIEW, token)
    )
}

fn map_row(row: &Row) -> Result<Invitation, rusqlite::Error> {
    let raw_group_id = row.get(1)?;
    let raw_invited_by = row.get(2)?;

    Ok(Invitation {
        token: row.get(0)?,
        group_id: GroupID::new(raw_group_id),
        invited_by: UserID::new(raw_invited_by),
        created_at: row.get(3)?,
    })
}

#[cfg(test)]
mod invitation_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::{PasswordHash, UserID, user::create_user},
        db::initialize,
        group::{GroupName, create_group, membership::count_members},
    };

    use super::{
        JoinOutcome, build_invite_link, create_invitation, get_invitation, redeem_invitation,
    };

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
    fn create_invitation_produces_unique_retrievable_tokens() {
        let mut connection = get_db_connection();
        let alice = insert_test_user(&connection, "alice@example.com");
        let group = create_group(&GroupName::new("Flat").unwrap(), alice, &mut connection).unwrap();

        let first = create_invitation(group.id, alice, &connection).unwrap();
        let second = create_invitation(group.id, alice, &connection).unwrap();

        assert_ne!(first.token, second.token);
        assert_eq!(get_invitation(&first.token, &connection).unwrap(), first);
    }

    #[test]
    fn redeem_inserts_exactly_one_membership() {
        let mut connection = get_db_connection();
        let alice = insert_test_user(&connection, "alice@example.com");
        let bob = insert_test_user(&connection, "bob@example.com");
        let group = create_group(&GroupName::new("Flat").unwrap(), alice, &mut connection).unwrap();
        let invitation = create_invitation(group.id, alice, &connection).unwrap();

        let outcome = redeem_invitation(&invitation.token, bob, &connection).unwrap();

        assert_eq!(outcome, JoinOutcome::Joined(group.clone()));
        assert_eq!(count_members(group.id, &connection).unwrap(), 2);
    }

    #[test]
    fn redeeming_twice_reports_already_member_and_writes_nothing() {
        let mut connection = get_db_connection();
        let alice = insert_test_user(&connection, "alice@example.com");
        let bob = insert_test_user(&connection, "bob@example.com");
        let group = create_group(&GroupName::new("Flat").unwrap(), alice, &mut connection).unwrap();
        let invitation = create_invitation(group.id, alice, &connection).unwrap();

        redeem_invitation(&invitation.token, bob, &connection).unwrap();
        let outcome = redeem_invitation(&invitation.token, bob, &connection).unwrap();

        assert_eq!(outcome, JoinOutcome::AlreadyMember(group.clone()));
        assert_eq!(count_members(group.id, &connection).unwrap(), 2);
    }

    #[test]
    fn one_token_can_admit_several_users() {
        let mut connection = get_db_connection();
        let alice = insert_test_user(&connection, "alice@example.com");
        let bob = insert_test_user(&connection, "bob@example.com");
        let carol = insert_test_user(&connection, "carol@example.com");
        let group = create_group(&GroupName::new("Flat").unwrap(), alice, &mut connection).unwrap();
        let invitation = create_invitation(group.id, alice, &connection).unwrap();

        redeem_invitation(&invitation.token, bob, &connection).unwrap();
        redeem_invitation(&invitation.token, carol, &connection).unwrap();

        assert_eq!(count_members(group.id, &connection).unwrap(), 3);
    }

    #[test]
    fn redeeming_unknown_token_fails_and_writes_nothing() {
        let mut connection = get_db_connection();
        let alice = insert_test_user(&connection, "alice@example.com");
        let bob = insert_test_user(&connection, "bob@example.com");
        let group = create_group(&GroupName::new("Flat").unwrap(), alice, &mut connection).unwrap();

        let result = redeem_invitation("not-a-token", bob, &connection);

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(count_members(group.id, &connection).unwrap(), 1);
    }

    #[test]
    fn invite_link_joins_base_url_and_token() {
        assert_eq!(
            build_invite_link("https://ponyup.example.com", "beefcafe"),
            "https://ponyup.example.com/join-group/beefcafe"
        );
    }
}
