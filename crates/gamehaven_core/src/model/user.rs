//! User account model.
//!
//! # Invariants
//! - `email` is the login key in practice; storage does not enforce uniqueness.
//! - `password` is kept and compared as plaintext. This is a known security
//!   defect carried over for compatibility with existing data; it must never
//!   be logged.

use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Account role. Persisted as `1` (admin) / `0` (regular).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Regular,
}

impl UserRole {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn from_admin_flag(is_admin: bool) -> Self {
        if is_admin {
            Self::Admin
        } else {
            Self::Regular
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    /// Local path or URL of the avatar picked by the user.
    pub photo: Option<String>,
}

impl User {
    /// Creates an unsaved user without a photo.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: super::UNSAVED_ID,
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role,
            photo: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
