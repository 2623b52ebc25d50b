//! Library (owned games) repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `insert_purchased_game` upserts on `id` conflict.
//! - `update_download_status` accepts any transition; forward-only movement
//!   is a client convention.

use super::{collect_rows, count, expect_changed, first_row, RepoError, RepoResult};
use crate::model::game::GameId;
use crate::model::purchased_game::{DownloadStatus, PurchasedGame, PurchasedGameId};
use crate::model::user::UserId;
use crate::model::UNSAVED_ID;
use rusqlite::{params, Connection, Row};

const PURCHASED_GAME_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    game_id,
    purchase_date,
    transaction_id,
    download_status
FROM purchased_games";

/// Repository interface for owned games.
pub trait PurchasedGameRepository {
    fn insert_purchased_game(&self, purchased: &PurchasedGame) -> RepoResult<PurchasedGameId>;
    fn update_purchased_game(&self, purchased: &PurchasedGame) -> RepoResult<()>;
    fn delete_purchased_game(&self, id: PurchasedGameId) -> RepoResult<()>;
    fn get_purchased_game(&self, id: PurchasedGameId) -> RepoResult<Option<PurchasedGame>>;
    /// Ownership probe; returns the earliest matching entry.
    fn find_by_user_and_game(
        &self,
        user_id: UserId,
        game_id: GameId,
    ) -> RepoResult<Option<PurchasedGame>>;
    /// User library, most recent purchase first.
    fn list_by_user(&self, user_id: UserId) -> RepoResult<Vec<PurchasedGame>>;
    fn count_by_user(&self, user_id: UserId) -> RepoResult<i64>;
    fn update_download_status(
        &self,
        id: PurchasedGameId,
        status: DownloadStatus,
    ) -> RepoResult<()>;
}

/// SQLite-backed owned-games repository.
pub struct SqlitePurchasedGameRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePurchasedGameRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PurchasedGameRepository for SqlitePurchasedGameRepository<'_> {
    fn insert_purchased_game(&self, purchased: &PurchasedGame) -> RepoResult<PurchasedGameId> {
        self.conn.execute(
            "INSERT INTO purchased_games (
                id,
                user_id,
                game_id,
                purchase_date,
                transaction_id,
                download_status
            ) VALUES (NULLIF(?1, 0), ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                game_id = excluded.game_id,
                purchase_date = excluded.purchase_date,
                transaction_id = excluded.transaction_id,
                download_status = excluded.download_status;",
            params![
                purchased.id,
                purchased.user_id,
                purchased.game_id,
                purchased.purchase_date,
                purchased.transaction_id,
                purchased.download_status.as_str(),
            ],
        )?;

        if purchased.id == UNSAVED_ID {
            Ok(self.conn.last_insert_rowid())
        } else {
            Ok(purchased.id)
        }
    }

    fn update_purchased_game(&self, purchased: &PurchasedGame) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE purchased_games
             SET
                user_id = ?1,
                game_id = ?2,
                purchase_date = ?3,
                transaction_id = ?4,
                download_status = ?5
             WHERE id = ?6;",
            params![
                purchased.user_id,
                purchased.game_id,
                purchased.purchase_date,
                purchased.transaction_id,
                purchased.download_status.as_str(),
                purchased.id,
            ],
        )?;
        expect_changed(changed, "purchased game", purchased.id)
    }

    fn delete_purchased_game(&self, id: PurchasedGameId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM purchased_games WHERE id = ?1;", [id])?;
        expect_changed(changed, "purchased game", id)
    }

    fn get_purchased_game(&self, id: PurchasedGameId) -> RepoResult<Option<PurchasedGame>> {
        first_row(
            self.conn,
            &format!("{PURCHASED_GAME_SELECT_SQL} WHERE id = ?1;"),
            [id],
            parse_purchased_game_row,
        )
    }

    fn find_by_user_and_game(
        &self,
        user_id: UserId,
        game_id: GameId,
    ) -> RepoResult<Option<PurchasedGame>> {
        first_row(
            self.conn,
            &format!(
                "{PURCHASED_GAME_SELECT_SQL}
                 WHERE user_id = ?1 AND game_id = ?2
                 ORDER BY id ASC
                 LIMIT 1;"
            ),
            [user_id, game_id],
            parse_purchased_game_row,
        )
    }

    fn list_by_user(&self, user_id: UserId) -> RepoResult<Vec<PurchasedGame>> {
        collect_rows(
            self.conn,
            &format!(
                "{PURCHASED_GAME_SELECT_SQL}
                 WHERE user_id = ?1
                 ORDER BY purchase_date DESC, id DESC;"
            ),
            [user_id],
            parse_purchased_game_row,
        )
    }

    fn count_by_user(&self, user_id: UserId) -> RepoResult<i64> {
        count(
            self.conn,
            "SELECT COUNT(*) FROM purchased_games WHERE user_id = ?1;",
            [user_id],
        )
    }

    fn update_download_status(
        &self,
        id: PurchasedGameId,
        status: DownloadStatus,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE purchased_games SET download_status = ?1 WHERE id = ?2;",
            params![status.as_str(), id],
        )?;
        expect_changed(changed, "purchased game", id)
    }
}

fn parse_purchased_game_row(row: &Row<'_>) -> RepoResult<PurchasedGame> {
    let status_text: String = row.get("download_status")?;
    let download_status = DownloadStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid download status `{status_text}` in purchased_games.download_status"
        ))
    })?;

    Ok(PurchasedGame {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        game_id: row.get("game_id")?,
        purchase_date: row.get("purchase_date")?,
        transaction_id: row.get("transaction_id")?,
        download_status,
    })
}
