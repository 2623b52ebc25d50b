//! Catalog facade used by the store, discover and admin-game screens.

use crate::model::game::{Game, GameId, DEFAULT_LOW_STOCK_THRESHOLD};
use crate::repo::game_repo::{GameRepository, SqliteGameRepository};
use crate::repo::RepoResult;
use crate::store::{LiveQuery, Store, Table, GAME_DELETE_TABLES};

/// Inventory figures shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InventoryStats {
    pub total: i64,
    pub available: i64,
    pub out_of_stock: i64,
    pub inventory_value: f64,
}

#[derive(Clone)]
pub struct GameFacade {
    store: Store,
}

impl GameFacade {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Inserts or overwrites (same id) a game, returning its id.
    pub async fn insert(&self, game: Game) -> RepoResult<GameId> {
        self.store
            .write(&[Table::Games], move |conn| {
                SqliteGameRepository::new(conn).insert_game(&game)
            })
            .await
    }

    pub async fn update(&self, game: Game) -> RepoResult<()> {
        self.store
            .write(&[Table::Games], move |conn| {
                SqliteGameRepository::new(conn).update_game(&game)
            })
            .await
    }

    pub async fn delete(&self, id: GameId) -> RepoResult<()> {
        self.store
            .write(GAME_DELETE_TABLES, move |conn| {
                SqliteGameRepository::new(conn).delete_game(id)
            })
            .await
    }

    pub async fn get(&self, id: GameId) -> RepoResult<Option<Game>> {
        self.store
            .read(move |conn| SqliteGameRepository::new(conn).get_game(id))
            .await
    }

    /// One-shot catalog listing, for callers that do not follow changes.
    pub async fn list_games(&self) -> RepoResult<Vec<Game>> {
        self.store
            .read(|conn| SqliteGameRepository::new(conn).list_games())
            .await
    }

    pub async fn search_games(&self, term: impl Into<String>) -> RepoResult<Vec<Game>> {
        let term = term.into();
        self.store
            .read(move |conn| SqliteGameRepository::new(conn).search_games(&term))
            .await
    }

    pub async fn count_games(&self) -> RepoResult<i64> {
        self.store
            .read(|conn| SqliteGameRepository::new(conn).count_games())
            .await
    }

    pub async fn count_available(&self) -> RepoResult<i64> {
        self.store
            .read(|conn| SqliteGameRepository::new(conn).count_available_games())
            .await
    }

    pub async fn count_out_of_stock(&self) -> RepoResult<i64> {
        self.store
            .read(|conn| SqliteGameRepository::new(conn).count_out_of_stock_games())
            .await
    }

    pub async fn inventory_value(&self) -> RepoResult<f64> {
        self.store
            .read(|conn| SqliteGameRepository::new(conn).total_inventory_value())
            .await
    }

    /// All inventory figures from one consistent read.
    pub async fn stats(&self) -> RepoResult<InventoryStats> {
        self.store
            .read(|conn| {
                let repo = SqliteGameRepository::new(conn);
                Ok(InventoryStats {
                    total: repo.count_games()?,
                    available: repo.count_available_games()?,
                    out_of_stock: repo.count_out_of_stock_games()?,
                    inventory_value: repo.total_inventory_value()?,
                })
            })
            .await
    }

    pub async fn all_games(&self) -> RepoResult<LiveQuery<Vec<Game>>> {
        self.store
            .live(&[Table::Games], |conn| {
                SqliteGameRepository::new(conn).list_games()
            })
            .await
    }

    pub async fn games_by_category(
        &self,
        category: impl Into<String>,
    ) -> RepoResult<LiveQuery<Vec<Game>>> {
        let category = category.into();
        self.store
            .live(&[Table::Games], move |conn| {
                SqliteGameRepository::new(conn).list_games_by_category(&category)
            })
            .await
    }

    pub async fn categories(&self) -> RepoResult<LiveQuery<Vec<String>>> {
        self.store
            .live(&[Table::Games], |conn| {
                SqliteGameRepository::new(conn).list_categories()
            })
            .await
    }

    pub async fn search(&self, term: impl Into<String>) -> RepoResult<LiveQuery<Vec<Game>>> {
        let term = term.into();
        self.store
            .live(&[Table::Games], move |conn| {
                SqliteGameRepository::new(conn).search_games(&term)
            })
            .await
    }

    /// Games with `stock <= threshold` (default 5).
    pub async fn low_stock(&self, threshold: Option<i64>) -> RepoResult<LiveQuery<Vec<Game>>> {
        let threshold = threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
        self.store
            .live(&[Table::Games], move |conn| {
                SqliteGameRepository::new(conn).list_low_stock_games(threshold)
            })
            .await
    }
}
