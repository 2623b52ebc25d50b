//! Owned-games facade used by the "my games" and download screens.

use crate::model::game::GameId;
use crate::model::now_epoch_ms;
use crate::model::purchased_game::{DownloadStatus, PurchasedGame, PurchasedGameId};
use crate::model::user::UserId;
use crate::repo::purchased_game_repo::{PurchasedGameRepository, SqlitePurchasedGameRepository};
use crate::repo::RepoResult;
use crate::service::library_service::{LibraryService, StatusChange};
use crate::store::{LiveQuery, Store, Table, DOWNLOAD_STATUS_TABLES};

#[derive(Clone)]
pub struct LibraryFacade {
    store: Store,
}

impl LibraryFacade {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Inserts or overwrites (same id) a library entry.
    pub async fn insert(&self, purchased: PurchasedGame) -> RepoResult<PurchasedGameId> {
        self.store
            .write(&[Table::PurchasedGames], move |conn| {
                SqlitePurchasedGameRepository::new(conn).insert_purchased_game(&purchased)
            })
            .await
    }

    pub async fn update(&self, purchased: PurchasedGame) -> RepoResult<()> {
        self.store
            .write(&[Table::PurchasedGames], move |conn| {
                SqlitePurchasedGameRepository::new(conn).update_purchased_game(&purchased)
            })
            .await
    }

    pub async fn delete(&self, id: PurchasedGameId) -> RepoResult<()> {
        self.store
            .write(&[Table::PurchasedGames], move |conn| {
                SqlitePurchasedGameRepository::new(conn).delete_purchased_game(id)
            })
            .await
    }

    pub async fn get(&self, id: PurchasedGameId) -> RepoResult<Option<PurchasedGame>> {
        self.store
            .read(move |conn| SqlitePurchasedGameRepository::new(conn).get_purchased_game(id))
            .await
    }

    pub async fn find_owned(
        &self,
        user_id: UserId,
        game_id: GameId,
    ) -> RepoResult<Option<PurchasedGame>> {
        self.store
            .read(move |conn| {
                SqlitePurchasedGameRepository::new(conn).find_by_user_and_game(user_id, game_id)
            })
            .await
    }

    /// Current library of `user_id` without subscribing to changes.
    pub async fn owned_by(&self, user_id: UserId) -> RepoResult<Vec<PurchasedGame>> {
        self.store
            .read(move |conn| SqlitePurchasedGameRepository::new(conn).list_by_user(user_id))
            .await
    }

    pub async fn is_owned(&self, user_id: UserId, game_id: GameId) -> RepoResult<bool> {
        Ok(self.find_owned(user_id, game_id).await?.is_some())
    }

    pub async fn count_for_user(&self, user_id: UserId) -> RepoResult<i64> {
        self.store
            .read(move |conn| SqlitePurchasedGameRepository::new(conn).count_by_user(user_id))
            .await
    }

    /// Sets the status; reaching `Downloaded`/`Installed` appends history
    /// stamped with the current time.
    pub async fn update_download_status(
        &self,
        id: PurchasedGameId,
        status: DownloadStatus,
    ) -> RepoResult<StatusChange> {
        self.store
            .write(DOWNLOAD_STATUS_TABLES, move |conn| {
                LibraryService::new(conn).update_download_status(id, status, now_epoch_ms())
            })
            .await
    }

    pub async fn library(&self, user_id: UserId) -> RepoResult<LiveQuery<Vec<PurchasedGame>>> {
        self.store
            .live(&[Table::PurchasedGames], move |conn| {
                SqlitePurchasedGameRepository::new(conn).list_by_user(user_id)
            })
            .await
    }
}
