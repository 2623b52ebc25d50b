//! Catalog entry model.

use serde::{Deserialize, Serialize};

pub type GameId = i64;

/// Stock threshold used by low-stock listings when callers pass none.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub title: String,
    pub description: String,
    pub developer: String,
    pub category: String,
    pub price: f64,
    /// Unix epoch milliseconds.
    pub release_date: Option<i64>,
    /// Expected to stay `>= 0`; not enforced by storage.
    pub stock: i64,
    pub file_url: String,
    pub image_url: String,
}

impl Game {
    /// Creates an unsaved game with empty descriptive fields.
    pub fn new(title: impl Into<String>, price: f64, stock: i64) -> Self {
        Self {
            id: super::UNSAVED_ID,
            title: title.into(),
            description: String::new(),
            developer: String::new(),
            category: String::new(),
            price,
            release_date: None,
            stock,
            file_url: String::new(),
            image_url: String::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.stock > 0
    }
}
