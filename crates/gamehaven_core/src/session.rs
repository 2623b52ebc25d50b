//! Logged-in user session persisted across restarts.
//!
//! # Responsibility
//! - Remember who is logged in (id, username, email, role).
//! - Provide is-logged-in and logout (clear-all) operations.
//!
//! # Invariants
//! - The session file exists iff a user is logged in.
//! - No validation and no expiry: the store holds whatever was saved last.
//! - Passwords are never part of the session.

use crate::model::user::{User, UserId, UserRole};
use crate::state_file::{self, StateFileResult};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Identity of the currently authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// File-backed session store.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the persisted session.
    pub fn save(&self, session: &Session) -> StateFileResult<()> {
        state_file::write_json(&self.path, session)?;
        info!(
            "event=session_save module=session status=ok user_id={} admin={}",
            session.user_id,
            session.is_admin()
        );
        Ok(())
    }

    /// Returns the persisted session, `None` when logged out.
    pub fn load(&self) -> StateFileResult<Option<Session>> {
        state_file::read_json(&self.path)
    }

    pub fn is_logged_in(&self) -> StateFileResult<bool> {
        Ok(self.load()?.is_some())
    }

    /// Clears everything the session store holds.
    pub fn logout(&self) -> StateFileResult<()> {
        state_file::remove(&self.path)?;
        info!("event=session_clear module=session status=ok");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, SessionStore};
    use crate::model::user::{User, UserRole};

    #[test]
    fn save_load_and_logout_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("user_session.json"));
        assert!(!store.is_logged_in().unwrap());

        let mut user = User::new("Farr", "farr@gmail.com", "123", UserRole::Admin);
        user.id = 7;
        let session = Session::from(&user);
        store.save(&session).unwrap();

        assert!(store.is_logged_in().unwrap());
        assert_eq!(store.load().unwrap(), Some(session));

        store.logout().unwrap();
        assert!(!store.is_logged_in().unwrap());
        store.logout().unwrap();
    }

    #[test]
    fn session_file_never_contains_password() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("user_session.json"));
        let user = User::new("shir", "shir@gmail.com", "secret-pass", UserRole::Regular);
        store.save(&Session::from(&user)).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains("secret-pass"));
        assert!(raw.contains("\"regular\""));
    }
}
