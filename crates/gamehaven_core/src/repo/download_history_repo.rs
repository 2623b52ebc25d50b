//! Download history repository (append-only log).

use super::{collect_rows, count, expect_changed, first_row, RepoResult};
use crate::model::download_history::{DownloadHistory, DownloadHistoryId};
use crate::model::game::GameId;
use crate::model::user::UserId;
use rusqlite::{params, Connection, Row};

const HISTORY_SELECT_SQL: &str =
    "SELECT id, user_id, game_id, download_date FROM download_history";

/// Repository interface for download history.
pub trait DownloadHistoryRepository {
    /// Plain insert; `id` is ignored and the generated id returned.
    fn insert_history(&self, entry: &DownloadHistory) -> RepoResult<DownloadHistoryId>;
    fn list_by_user(&self, user_id: UserId) -> RepoResult<Vec<DownloadHistory>>;
    fn list_by_game(&self, game_id: GameId) -> RepoResult<Vec<DownloadHistory>>;
    /// Most recent entry for the pair, if any.
    fn find_by_user_and_game(
        &self,
        user_id: UserId,
        game_id: GameId,
    ) -> RepoResult<Option<DownloadHistory>>;
    fn count_by_user(&self, user_id: UserId) -> RepoResult<i64>;
    fn delete_history(&self, id: DownloadHistoryId) -> RepoResult<()>;
}

/// SQLite-backed download history repository.
pub struct SqliteDownloadHistoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDownloadHistoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DownloadHistoryRepository for SqliteDownloadHistoryRepository<'_> {
    fn insert_history(&self, entry: &DownloadHistory) -> RepoResult<DownloadHistoryId> {
        self.conn.execute(
            "INSERT INTO download_history (user_id, game_id, download_date) VALUES (?1, ?2, ?3);",
            params![entry.user_id, entry.game_id, entry.download_date],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_by_user(&self, user_id: UserId) -> RepoResult<Vec<DownloadHistory>> {
        collect_rows(
            self.conn,
            &format!(
                "{HISTORY_SELECT_SQL} WHERE user_id = ?1 ORDER BY download_date DESC, id DESC;"
            ),
            [user_id],
            parse_history_row,
        )
    }

    fn list_by_game(&self, game_id: GameId) -> RepoResult<Vec<DownloadHistory>> {
        collect_rows(
            self.conn,
            &format!(
                "{HISTORY_SELECT_SQL} WHERE game_id = ?1 ORDER BY download_date DESC, id DESC;"
            ),
            [game_id],
            parse_history_row,
        )
    }

    fn find_by_user_and_game(
        &self,
        user_id: UserId,
        game_id: GameId,
    ) -> RepoResult<Option<DownloadHistory>> {
        first_row(
            self.conn,
            &format!(
                "{HISTORY_SELECT_SQL}
                 WHERE user_id = ?1 AND game_id = ?2
                 ORDER BY download_date DESC, id DESC
                 LIMIT 1;"
            ),
            [user_id, game_id],
            parse_history_row,
        )
    }

    fn count_by_user(&self, user_id: UserId) -> RepoResult<i64> {
        count(
            self.conn,
            "SELECT COUNT(*) FROM download_history WHERE user_id = ?1;",
            [user_id],
        )
    }

    fn delete_history(&self, id: DownloadHistoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM download_history WHERE id = ?1;", [id])?;
        expect_changed(changed, "download history", id)
    }
}

fn parse_history_row(row: &Row<'_>) -> RepoResult<DownloadHistory> {
    Ok(DownloadHistory {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        game_id: row.get("game_id")?,
        download_date: row.get("download_date")?,
    })
}
