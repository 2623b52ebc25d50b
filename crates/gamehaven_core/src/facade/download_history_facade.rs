//! Download history facade.

use crate::model::download_history::{DownloadHistory, DownloadHistoryId};
use crate::model::game::GameId;
use crate::model::user::UserId;
use crate::repo::download_history_repo::{
    DownloadHistoryRepository, SqliteDownloadHistoryRepository,
};
use crate::repo::RepoResult;
use crate::store::{LiveQuery, Store, Table};

#[derive(Clone)]
pub struct DownloadHistoryFacade {
    store: Store,
}

impl DownloadHistoryFacade {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn record(&self, entry: DownloadHistory) -> RepoResult<DownloadHistoryId> {
        self.store
            .write(&[Table::DownloadHistory], move |conn| {
                SqliteDownloadHistoryRepository::new(conn).insert_history(&entry)
            })
            .await
    }

    pub async fn delete(&self, id: DownloadHistoryId) -> RepoResult<()> {
        self.store
            .write(&[Table::DownloadHistory], move |conn| {
                SqliteDownloadHistoryRepository::new(conn).delete_history(id)
            })
            .await
    }

    pub async fn find(
        &self,
        user_id: UserId,
        game_id: GameId,
    ) -> RepoResult<Option<DownloadHistory>> {
        self.store
            .read(move |conn| {
                SqliteDownloadHistoryRepository::new(conn).find_by_user_and_game(user_id, game_id)
            })
            .await
    }

    pub async fn count_for_user(&self, user_id: UserId) -> RepoResult<i64> {
        self.store
            .read(move |conn| SqliteDownloadHistoryRepository::new(conn).count_by_user(user_id))
            .await
    }

    pub async fn by_user(&self, user_id: UserId) -> RepoResult<LiveQuery<Vec<DownloadHistory>>> {
        self.store
            .live(&[Table::DownloadHistory], move |conn| {
                SqliteDownloadHistoryRepository::new(conn).list_by_user(user_id)
            })
            .await
    }

    pub async fn by_game(&self, game_id: GameId) -> RepoResult<LiveQuery<Vec<DownloadHistory>>> {
        self.store
            .live(&[Table::DownloadHistory], move |conn| {
                SqliteDownloadHistoryRepository::new(conn).list_by_game(game_id)
            })
            .await
    }
}
