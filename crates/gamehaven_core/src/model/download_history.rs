//! Append-only log of finished downloads.
//!
//! `user_id`/`game_id` are loose references: rows survive deletion of the
//! user or game they mention.

use super::game::GameId;
use super::user::UserId;
use serde::{Deserialize, Serialize};

pub type DownloadHistoryId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadHistory {
    pub id: DownloadHistoryId,
    pub user_id: UserId,
    pub game_id: GameId,
    /// Unix epoch milliseconds.
    pub download_date: i64,
}

impl DownloadHistory {
    pub fn new(user_id: UserId, game_id: GameId, download_date: i64) -> Self {
        Self {
            id: super::UNSAVED_ID,
            user_id,
            game_id,
            download_date,
        }
    }
}
