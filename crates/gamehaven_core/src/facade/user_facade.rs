//! Account facade used by the auth and admin-user screens.

use crate::model::user::{User, UserId, UserRole};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::RepoResult;
use crate::store::{LiveQuery, Store, Table, USER_DELETE_TABLES};

/// Account counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserStats {
    pub total: i64,
    pub admins: i64,
    pub regulars: i64,
}

#[derive(Clone)]
pub struct UserFacade {
    store: Store,
}

impl UserFacade {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Inserts or overwrites (same id) a user, returning its id.
    pub async fn insert(&self, user: User) -> RepoResult<UserId> {
        self.store
            .write(&[Table::Users], move |conn| {
                SqliteUserRepository::new(conn).insert_user(&user)
            })
            .await
    }

    pub async fn update(&self, user: User) -> RepoResult<()> {
        self.store
            .write(&[Table::Users], move |conn| {
                SqliteUserRepository::new(conn).update_user(&user)
            })
            .await
    }

    /// Deletes a user together with their transactions and library.
    /// Their download history stays.
    pub async fn delete(&self, id: UserId) -> RepoResult<()> {
        self.store
            .write(USER_DELETE_TABLES, move |conn| {
                SqliteUserRepository::new(conn).delete_user(id)
            })
            .await
    }

    pub async fn get(&self, id: UserId) -> RepoResult<Option<User>> {
        self.store
            .read(move |conn| SqliteUserRepository::new(conn).get_user(id))
            .await
    }

    /// Plaintext credential check; see [`User`] for the security caveat.
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> RepoResult<Option<User>> {
        let email = email.into();
        let password = password.into();
        self.store
            .read(move |conn| SqliteUserRepository::new(conn).login(&email, &password))
            .await
    }

    pub async fn count_users(&self) -> RepoResult<i64> {
        self.store
            .read(|conn| SqliteUserRepository::new(conn).count_users())
            .await
    }

    pub async fn count_admins(&self) -> RepoResult<i64> {
        self.store
            .read(|conn| SqliteUserRepository::new(conn).count_users_by_role(UserRole::Admin))
            .await
    }

    pub async fn count_regular_users(&self) -> RepoResult<i64> {
        self.store
            .read(|conn| SqliteUserRepository::new(conn).count_users_by_role(UserRole::Regular))
            .await
    }

    /// All three counts from one consistent read.
    pub async fn stats(&self) -> RepoResult<UserStats> {
        self.store
            .read(|conn| {
                let repo = SqliteUserRepository::new(conn);
                Ok(UserStats {
                    total: repo.count_users()?,
                    admins: repo.count_users_by_role(UserRole::Admin)?,
                    regulars: repo.count_users_by_role(UserRole::Regular)?,
                })
            })
            .await
    }

    pub async fn all_users(&self) -> RepoResult<LiveQuery<Vec<User>>> {
        self.store
            .live(&[Table::Users], |conn| {
                SqliteUserRepository::new(conn).list_users()
            })
            .await
    }

    pub async fn users_by_role(&self, role: UserRole) -> RepoResult<LiveQuery<Vec<User>>> {
        self.store
            .live(&[Table::Users], move |conn| {
                SqliteUserRepository::new(conn).list_users_by_role(role)
            })
            .await
    }

    pub async fn search(&self, term: impl Into<String>) -> RepoResult<LiveQuery<Vec<User>>> {
        let term = term.into();
        self.store
            .live(&[Table::Users], move |conn| {
                SqliteUserRepository::new(conn).search_users(&term)
            })
            .await
    }
}
