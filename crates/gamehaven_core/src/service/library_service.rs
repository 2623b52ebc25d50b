//! Download/install progress tracking for owned games.
//!
//! # Invariants
//! - Moving an entry to `Downloaded` or `Installed` appends exactly one
//!   history row for that entry's user/game pair, every time it happens.
//! - Status write and history append commit together.

use crate::model::download_history::{DownloadHistory, DownloadHistoryId};
use crate::model::purchased_game::{DownloadStatus, PurchasedGameId};
use crate::repo::download_history_repo::{
    DownloadHistoryRepository, SqliteDownloadHistoryRepository,
};
use crate::repo::purchased_game_repo::{PurchasedGameRepository, SqlitePurchasedGameRepository};
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::{Connection, TransactionBehavior};

/// Result of a status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub purchased_game_id: PurchasedGameId,
    pub status: DownloadStatus,
    /// Set when the update counted as a finished download.
    pub history_id: Option<DownloadHistoryId>,
}

pub struct LibraryService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> LibraryService<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Sets the download status of one library entry.
    ///
    /// `now` is the history timestamp used when the status counts as completed.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when `id` matches no library entry.
    pub fn update_download_status(
        &mut self,
        id: PurchasedGameId,
        status: DownloadStatus,
        now: i64,
    ) -> RepoResult<StatusChange> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let library = SqlitePurchasedGameRepository::new(&tx);
        let entry = library
            .get_purchased_game(id)?
            .ok_or(RepoError::NotFound {
                entity: "purchased game",
                id,
            })?;
        library.update_download_status(id, status)?;

        let history_id = if status.is_completed() {
            let record = DownloadHistory::new(entry.user_id, entry.game_id, now);
            Some(SqliteDownloadHistoryRepository::new(&tx).insert_history(&record)?)
        } else {
            None
        };

        tx.commit()?;
        info!(
            "event=download_status module=service status=ok purchased_game_id={} download_status={} history_appended={}",
            id,
            status.as_str(),
            history_id.is_some()
        );

        Ok(StatusChange {
            purchased_game_id: id,
            status,
            history_id,
        })
    }
}
