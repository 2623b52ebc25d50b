//! Library entry: a game owned by a user through a completed transaction.

use super::game::GameId;
use super::transaction::TransactionId;
use super::user::UserId;
use serde::{Deserialize, Serialize};

pub type PurchasedGameId = i64;

/// Download/install progress of an owned game.
///
/// Clients only move it forward; storage accepts any transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DownloadStatus {
    #[default]
    NotDownloaded,
    Downloading,
    Downloaded,
    Installed,
}

impl DownloadStatus {
    /// Whether reaching this status counts as a finished download.
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Downloaded | Self::Installed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotDownloaded => "not_downloaded",
            Self::Downloading => "downloading",
            Self::Downloaded => "downloaded",
            Self::Installed => "installed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "not_downloaded" => Some(Self::NotDownloaded),
            "downloading" => Some(Self::Downloading),
            "downloaded" => Some(Self::Downloaded),
            "installed" => Some(Self::Installed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasedGame {
    pub id: PurchasedGameId,
    pub user_id: UserId,
    pub game_id: GameId,
    /// Unix epoch milliseconds.
    pub purchase_date: i64,
    pub transaction_id: TransactionId,
    pub download_status: DownloadStatus,
}

impl PurchasedGame {
    pub fn new(
        user_id: UserId,
        game_id: GameId,
        purchase_date: i64,
        transaction_id: TransactionId,
    ) -> Self {
        Self {
            id: super::UNSAVED_ID,
            user_id,
            game_id,
            purchase_date,
            transaction_id,
            download_status: DownloadStatus::NotDownloaded,
        }
    }
}
