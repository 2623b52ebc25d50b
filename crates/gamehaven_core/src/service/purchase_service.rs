//! Purchase recording use-case.
//!
//! # Responsibility
//! - Record a completed payment as one transaction header, its lines, and one
//!   library entry per line.
//!
//! # Invariants
//! - The whole sequence commits or rolls back as a unit.
//! - Every detail and library entry carries the generated transaction id.
//! - Library entries start as `DownloadStatus::NotDownloaded` and take the
//!   transaction date as their purchase date.

use crate::model::game::Game;
use crate::model::purchased_game::{PurchasedGame, PurchasedGameId};
use crate::model::transaction::{
    Transaction, TransactionDetail, TransactionDetailId, TransactionId,
};
use crate::model::user::UserId;
use crate::repo::purchased_game_repo::{PurchasedGameRepository, SqlitePurchasedGameRepository};
use crate::repo::transaction_detail_repo::{
    SqliteTransactionDetailRepository, TransactionDetailRepository,
};
use crate::repo::transaction_repo::{SqliteTransactionRepository, TransactionRepository};
use crate::repo::RepoResult;
use log::{error, info};
use rusqlite::{Connection, TransactionBehavior};

/// A completed payment waiting to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRequest {
    pub user_id: UserId,
    pub total_price: f64,
    /// Unix epoch milliseconds.
    pub date: i64,
    /// Pending lines; their `transaction_id` is overwritten.
    pub lines: Vec<TransactionDetail>,
}

impl PurchaseRequest {
    /// Builds a request whose total is the sum of its line totals.
    pub fn from_lines(user_id: UserId, date: i64, lines: Vec<TransactionDetail>) -> Self {
        let total_price = lines.iter().map(TransactionDetail::line_total).sum();
        Self {
            user_id,
            total_price,
            date,
            lines,
        }
    }

    /// Single-copy checkout of one game at its current price.
    pub fn single_game(user_id: UserId, game: &Game, date: i64) -> Self {
        Self::from_lines(
            user_id,
            date,
            vec![TransactionDetail::pending(game.id, game.price, 1)],
        )
    }
}

/// Ids generated while recording a purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub transaction_id: TransactionId,
    pub detail_ids: Vec<TransactionDetailId>,
    pub purchased_game_ids: Vec<PurchasedGameId>,
}

/// Records purchases on a ready connection.
pub struct PurchaseService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> PurchaseService<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Records `request` atomically and returns the generated ids.
    ///
    /// # Errors
    /// - Returns `RepoError::Db` when any insert fails (for example an unknown
    ///   user or game id); nothing is persisted in that case.
    pub fn record_purchase(&mut self, request: &PurchaseRequest) -> RepoResult<PurchaseReceipt> {
        match self.record_in_tx(request) {
            Ok(receipt) => {
                info!(
                    "event=purchase_recorded module=service status=ok user_id={} transaction_id={} lines={}",
                    request.user_id,
                    receipt.transaction_id,
                    receipt.detail_ids.len()
                );
                Ok(receipt)
            }
            Err(err) => {
                error!(
                    "event=purchase_recorded module=service status=error user_id={} lines={} error={}",
                    request.user_id,
                    request.lines.len(),
                    err
                );
                Err(err)
            }
        }
    }

    fn record_in_tx(&mut self, request: &PurchaseRequest) -> RepoResult<PurchaseReceipt> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let header = Transaction::new(request.user_id, request.total_price, request.date);
        let transaction_id = SqliteTransactionRepository::new(&tx).insert_transaction(&header)?;

        let stamped: Vec<TransactionDetail> = request
            .lines
            .iter()
            .map(|line| TransactionDetail {
                transaction_id,
                ..line.clone()
            })
            .collect();
        let detail_ids =
            SqliteTransactionDetailRepository::new(&tx).insert_details(transaction_id, &stamped)?;

        let library = SqlitePurchasedGameRepository::new(&tx);
        let mut purchased_game_ids = Vec::with_capacity(stamped.len());
        for line in &stamped {
            let entry =
                PurchasedGame::new(request.user_id, line.game_id, request.date, transaction_id);
            purchased_game_ids.push(library.insert_purchased_game(&entry)?);
        }

        tx.commit()?;
        Ok(PurchaseReceipt {
            transaction_id,
            detail_ids,
            purchased_game_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::PurchaseRequest;
    use crate::model::transaction::TransactionDetail;

    #[test]
    fn from_lines_sums_price_times_qty() {
        let request = PurchaseRequest::from_lines(
            1,
            1_000,
            vec![
                TransactionDetail::pending(2, 40_000.0, 1),
                TransactionDetail::pending(3, 15_000.0, 2),
            ],
        );
        assert_eq!(request.total_price, 70_000.0);
    }
}
