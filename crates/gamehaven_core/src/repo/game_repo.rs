//! Game catalog repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Catalog CRUD, inventory aggregates, categories, search and low-stock
//!   listings used by the store and admin dashboards.
//!
//! # Invariants
//! - `count_available_games + count_out_of_stock_games == count_games`.
//! - Deleting a game cascades to purchase lines and library entries.

use super::{collect_rows, count, expect_changed, first_row, like_pattern, RepoResult};
use crate::model::game::{Game, GameId};
use crate::model::UNSAVED_ID;
use rusqlite::{params, Connection, Row};

const GAME_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    developer,
    category,
    price,
    release_date,
    stock,
    file_url,
    image_url
FROM games";

/// Repository interface for the game catalog.
pub trait GameRepository {
    /// Inserts a new game (id `0`) or overwrites the row with the same id.
    fn insert_game(&self, game: &Game) -> RepoResult<GameId>;
    fn update_game(&self, game: &Game) -> RepoResult<()>;
    fn delete_game(&self, id: GameId) -> RepoResult<()>;
    fn get_game(&self, id: GameId) -> RepoResult<Option<Game>>;
    /// All games, newest first.
    fn list_games(&self) -> RepoResult<Vec<Game>>;
    fn list_games_by_category(&self, category: &str) -> RepoResult<Vec<Game>>;
    /// Case-insensitive substring match over title, developer or category.
    fn search_games(&self, term: &str) -> RepoResult<Vec<Game>>;
    /// Games whose stock is at or below `threshold`.
    fn list_low_stock_games(&self, threshold: i64) -> RepoResult<Vec<Game>>;
    /// Distinct categories sorted by name.
    fn list_categories(&self) -> RepoResult<Vec<String>>;
    fn count_games(&self) -> RepoResult<i64>;
    fn count_available_games(&self) -> RepoResult<i64>;
    fn count_out_of_stock_games(&self) -> RepoResult<i64>;
    /// Sum of `price` over the catalog, `0.0` when empty.
    fn total_inventory_value(&self) -> RepoResult<f64>;
}

/// SQLite-backed game repository.
pub struct SqliteGameRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGameRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl GameRepository for SqliteGameRepository<'_> {
    fn insert_game(&self, game: &Game) -> RepoResult<GameId> {
        self.conn.execute(
            "INSERT INTO games (
                id,
                title,
                description,
                developer,
                category,
                price,
                release_date,
                stock,
                file_url,
                image_url
            ) VALUES (NULLIF(?1, 0), ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                developer = excluded.developer,
                category = excluded.category,
                price = excluded.price,
                release_date = excluded.release_date,
                stock = excluded.stock,
                file_url = excluded.file_url,
                image_url = excluded.image_url;",
            params![
                game.id,
                game.title.as_str(),
                game.description.as_str(),
                game.developer.as_str(),
                game.category.as_str(),
                game.price,
                game.release_date,
                game.stock,
                game.file_url.as_str(),
                game.image_url.as_str(),
            ],
        )?;

        if game.id == UNSAVED_ID {
            Ok(self.conn.last_insert_rowid())
        } else {
            Ok(game.id)
        }
    }

    fn update_game(&self, game: &Game) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE games
             SET
                title = ?1,
                description = ?2,
                developer = ?3,
                category = ?4,
                price = ?5,
                release_date = ?6,
                stock = ?7,
                file_url = ?8,
                image_url = ?9
             WHERE id = ?10;",
            params![
                game.title.as_str(),
                game.description.as_str(),
                game.developer.as_str(),
                game.category.as_str(),
                game.price,
                game.release_date,
                game.stock,
                game.file_url.as_str(),
                game.image_url.as_str(),
                game.id,
            ],
        )?;
        expect_changed(changed, "game", game.id)
    }

    fn delete_game(&self, id: GameId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM games WHERE id = ?1;", [id])?;
        expect_changed(changed, "game", id)
    }

    fn get_game(&self, id: GameId) -> RepoResult<Option<Game>> {
        first_row(
            self.conn,
            &format!("{GAME_SELECT_SQL} WHERE id = ?1;"),
            [id],
            parse_game_row,
        )
    }

    fn list_games(&self) -> RepoResult<Vec<Game>> {
        collect_rows(
            self.conn,
            &format!("{GAME_SELECT_SQL} ORDER BY id DESC;"),
            [],
            parse_game_row,
        )
    }

    fn list_games_by_category(&self, category: &str) -> RepoResult<Vec<Game>> {
        collect_rows(
            self.conn,
            &format!("{GAME_SELECT_SQL} WHERE category = ?1 ORDER BY id DESC;"),
            [category],
            parse_game_row,
        )
    }

    fn search_games(&self, term: &str) -> RepoResult<Vec<Game>> {
        collect_rows(
            self.conn,
            &format!(
                "{GAME_SELECT_SQL}
                 WHERE title LIKE ?1 ESCAPE '\\'
                    OR developer LIKE ?1 ESCAPE '\\'
                    OR category LIKE ?1 ESCAPE '\\'
                 ORDER BY id DESC;"
            ),
            [like_pattern(term)],
            parse_game_row,
        )
    }

    fn list_low_stock_games(&self, threshold: i64) -> RepoResult<Vec<Game>> {
        collect_rows(
            self.conn,
            &format!("{GAME_SELECT_SQL} WHERE stock <= ?1 ORDER BY stock ASC, id DESC;"),
            [threshold],
            parse_game_row,
        )
    }

    fn list_categories(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT category FROM games ORDER BY category COLLATE NOCASE ASC;")?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(row.get::<_, String>(0)?);
        }
        Ok(categories)
    }

    fn count_games(&self) -> RepoResult<i64> {
        count(self.conn, "SELECT COUNT(*) FROM games;", [])
    }

    fn count_available_games(&self) -> RepoResult<i64> {
        count(self.conn, "SELECT COUNT(*) FROM games WHERE stock > 0;", [])
    }

    fn count_out_of_stock_games(&self) -> RepoResult<i64> {
        // `<= 0` keeps the available/out-of-stock split total even for
        // negative stock, which storage does not forbid.
        count(self.conn, "SELECT COUNT(*) FROM games WHERE stock <= 0;", [])
    }

    fn total_inventory_value(&self) -> RepoResult<f64> {
        let total: Option<f64> =
            self.conn
                .query_row("SELECT SUM(price) FROM games;", [], |row| row.get(0))?;
        Ok(total.unwrap_or(0.0))
    }
}

fn parse_game_row(row: &Row<'_>) -> RepoResult<Game> {
    Ok(Game {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        developer: row.get("developer")?,
        category: row.get("category")?,
        price: row.get("price")?,
        release_date: row.get("release_date")?,
        stock: row.get("stock")?,
        file_url: row.get("file_url")?,
        image_url: row.get("image_url")?,
    })
}
