//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Account CRUD, plaintext login lookup, role counts and search.
//!
//! # Invariants
//! - `insert_user` upserts on `id` conflict instead of deleting the old row,
//!   so dependent rows are never cascaded away by a re-insert.
//! - `login` is an exact, case-sensitive match on both email and password.

use super::{
    collect_rows, count, expect_changed, first_row, like_pattern, RepoError, RepoResult,
};
use crate::model::user::{User, UserId, UserRole};
use crate::model::UNSAVED_ID;
use log::info;
use rusqlite::{params, Connection, Row};

const USER_SELECT_SQL: &str = "SELECT id, username, email, password, role, photo FROM users";

/// Repository interface for user accounts.
pub trait UserRepository {
    /// Inserts a new user (id `0`) or overwrites the row with the same id.
    fn insert_user(&self, user: &User) -> RepoResult<UserId>;
    fn update_user(&self, user: &User) -> RepoResult<()>;
    /// Deletes the user; owned transactions and purchases cascade.
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    fn login(&self, email: &str, password: &str) -> RepoResult<Option<User>>;
    /// All users, newest first.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn list_users_by_role(&self, role: UserRole) -> RepoResult<Vec<User>>;
    /// Case-insensitive substring match over username or email.
    fn search_users(&self, term: &str) -> RepoResult<Vec<User>>;
    fn count_users(&self) -> RepoResult<i64>;
    fn count_users_by_role(&self, role: UserRole) -> RepoResult<i64>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn insert_user(&self, user: &User) -> RepoResult<UserId> {
        self.conn.execute(
            "INSERT INTO users (id, username, email, password, role, photo)
             VALUES (NULLIF(?1, 0), ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                email = excluded.email,
                password = excluded.password,
                role = excluded.role,
                photo = excluded.photo;",
            params![
                user.id,
                user.username.as_str(),
                user.email.as_str(),
                user.password.as_str(),
                role_to_db(user.role),
                user.photo.as_deref(),
            ],
        )?;

        if user.id == UNSAVED_ID {
            Ok(self.conn.last_insert_rowid())
        } else {
            Ok(user.id)
        }
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE users
             SET
                username = ?1,
                email = ?2,
                password = ?3,
                role = ?4,
                photo = ?5
             WHERE id = ?6;",
            params![
                user.username.as_str(),
                user.email.as_str(),
                user.password.as_str(),
                role_to_db(user.role),
                user.photo.as_deref(),
                user.id,
            ],
        )?;
        expect_changed(changed, "user", user.id)
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        expect_changed(changed, "user", id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        first_row(
            self.conn,
            &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
            [id],
            parse_user_row,
        )
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        first_row(
            self.conn,
            &format!("{USER_SELECT_SQL} WHERE email = ?1 ORDER BY id ASC LIMIT 1;"),
            [email],
            parse_user_row,
        )
    }

    fn login(&self, email: &str, password: &str) -> RepoResult<Option<User>> {
        let user = first_row(
            self.conn,
            &format!(
                "{USER_SELECT_SQL}
                 WHERE email = ?1 COLLATE BINARY
                   AND password = ?2 COLLATE BINARY
                 ORDER BY id ASC
                 LIMIT 1;"
            ),
            params![email, password],
            parse_user_row,
        )?;

        match &user {
            Some(found) => info!(
                "event=user_login module=repo status=ok user_id={}",
                found.id
            ),
            None => info!("event=user_login module=repo status=rejected"),
        }
        Ok(user)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        collect_rows(
            self.conn,
            &format!("{USER_SELECT_SQL} ORDER BY id DESC;"),
            [],
            parse_user_row,
        )
    }

    fn list_users_by_role(&self, role: UserRole) -> RepoResult<Vec<User>> {
        collect_rows(
            self.conn,
            &format!("{USER_SELECT_SQL} WHERE role = ?1 ORDER BY id DESC;"),
            [role_to_db(role)],
            parse_user_row,
        )
    }

    fn search_users(&self, term: &str) -> RepoResult<Vec<User>> {
        collect_rows(
            self.conn,
            &format!(
                "{USER_SELECT_SQL}
                 WHERE username LIKE ?1 ESCAPE '\\'
                    OR email LIKE ?1 ESCAPE '\\'
                 ORDER BY id DESC;"
            ),
            [like_pattern(term)],
            parse_user_row,
        )
    }

    fn count_users(&self) -> RepoResult<i64> {
        count(self.conn, "SELECT COUNT(*) FROM users;", [])
    }

    fn count_users_by_role(&self, role: UserRole) -> RepoResult<i64> {
        count(
            self.conn,
            "SELECT COUNT(*) FROM users WHERE role = ?1;",
            [role_to_db(role)],
        )
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let role = match row.get::<_, i64>("role")? {
        0 => UserRole::Regular,
        1 => UserRole::Admin,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid role value `{other}` in users.role"
            )));
        }
    };

    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        password: row.get("password")?,
        role,
        photo: row.get("photo")?,
    })
}

fn role_to_db(role: UserRole) -> i64 {
    if role.is_admin() {
        1
    } else {
        0
    }
}
