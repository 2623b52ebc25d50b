//! Sale records: one `Transaction` header with its `TransactionDetail` lines.
//!
//! # Invariants
//! - `total_price` is expected to equal the sum of `price * qty` over the
//!   details; storage does not enforce it.
//! - `TransactionDetail::price` is a snapshot of the game price at sale time.

use super::game::GameId;
use super::user::UserId;
use serde::{Deserialize, Serialize};

pub type TransactionId = i64;
pub type TransactionDetailId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub total_price: f64,
    /// Unix epoch milliseconds.
    pub date: i64,
}

impl Transaction {
    pub fn new(user_id: UserId, total_price: f64, date: i64) -> Self {
        Self {
            id: super::UNSAVED_ID,
            user_id,
            total_price,
            date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetail {
    pub id: TransactionDetailId,
    /// Stamped by the purchase flow; ignored on pending lines.
    pub transaction_id: TransactionId,
    pub game_id: GameId,
    pub price: f64,
    pub qty: i64,
}

impl TransactionDetail {
    /// Creates a pending line not yet tied to a transaction.
    pub fn pending(game_id: GameId, price: f64, qty: i64) -> Self {
        Self {
            id: super::UNSAVED_ID,
            transaction_id: super::UNSAVED_ID,
            game_id,
            price,
            qty,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * self.qty as f64
    }
}

/// Revenue aggregate over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesSummary {
    pub revenue: f64,
    pub transaction_count: i64,
    /// `0.0` when there are no transactions.
    pub average_transaction: f64,
}

/// Half-open `[since, until)` filter over `Transaction::date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub since: Option<i64>,
    pub until: Option<i64>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    /// Range covering the `window_ms` milliseconds before `now`.
    pub fn trailing(now: i64, window_ms: i64) -> Self {
        Self {
            since: Some(now.saturating_sub(window_ms)),
            until: None,
        }
    }
}
