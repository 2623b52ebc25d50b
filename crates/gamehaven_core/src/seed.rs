//! First-run demo data.
//!
//! # Responsibility
//! - Insert two demo accounts and three demo games exactly once per install.
//!
//! # Invariants
//! - The seed marker is written only after the inserts committed; a crash in
//!   between re-seeds on the next start.
//! - Seeding never touches existing rows.

use crate::model::game::Game;
use crate::model::now_epoch_ms;
use crate::model::user::{User, UserRole};
use crate::repo::game_repo::{GameRepository, SqliteGameRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::RepoError;
use crate::state_file::{self, StateFileError};
use crate::store::{Store, Table};
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

#[derive(Debug)]
pub enum SeedError {
    Repo(RepoError),
    Marker(StateFileError),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "seeding failed: {err}"),
            Self::Marker(err) => write!(f, "seed marker failed: {err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Marker(err) => Some(err),
        }
    }
}

impl From<RepoError> for SeedError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for SeedError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

impl From<StateFileError> for SeedError {
    fn from(value: StateFileError) -> Self {
        Self::Marker(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { users: usize, games: usize },
    AlreadySeeded,
}

#[derive(Debug, Serialize, Deserialize)]
struct SeedMarker {
    seeded: bool,
    seeded_at: i64,
}

/// Demo accounts created on first run. Passwords are plaintext by design of
/// the stored data; see [`User`].
pub fn demo_users() -> Vec<User> {
    vec![
        User::new("Farr", "farr@gmail.com", "123", UserRole::Admin),
        User::new("shir", "shir@gmail.com", "123", UserRole::Regular),
    ]
}

/// Demo catalog created on first run, released at `release_date`.
pub fn demo_games(release_date: i64) -> Vec<Game> {
    let game = |title: &str,
                description: &str,
                developer: &str,
                category: &str,
                price: f64,
                stock: i64,
                file_url: &str,
                image_url: &str| Game {
        description: description.to_string(),
        developer: developer.to_string(),
        category: category.to_string(),
        release_date: Some(release_date),
        file_url: file_url.to_string(),
        image_url: image_url.to_string(),
        ..Game::new(title, price, stock)
    };

    vec![
        game(
            "Cyber Jump",
            "Fast-paced cyber platformer game",
            "Farr Studio",
            "Action",
            25_000.0,
            100,
            "",
            "https://www.cyberjump.eu/wp-content/uploads/2024/07/cjpozsonyw.jpg",
        ),
        game(
            "Zombie Arena",
            "Survival zombie shooter",
            "Shir Corp",
            "Shooter",
            40_000.0,
            50,
            "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcS88N3tYJySO8ZbBFqpQEqNINB1EFcs8qYYdQ&s",
            "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcS88N3tYJySO8ZbBFqpQEqNINB1EFcs8qYYdQ&s",
        ),
        game(
            "Puzzle Quest",
            "Relaxing brain puzzle game",
            "Indie Dev",
            "Puzzle",
            15_000.0,
            200,
            "https://example.com/puzzle.apk",
            "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcSAUVY6-RFPBR3ae0ZUa56Oz1HsqgW6m6w0VQ&s",
        ),
    ]
}

/// Seeds demo data unless the marker at `marker_path` says it already ran.
pub fn seed_if_first_run(store: &Store, marker_path: &Path) -> Result<SeedOutcome, SeedError> {
    let marker: Option<SeedMarker> = state_file::read_json(marker_path)?;
    if marker.is_some_and(|marker| marker.seeded) {
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let now = now_epoch_ms();
    let users = demo_users();
    let games = demo_games(now);

    store.with_connection(|conn| {
        let tx = conn.transaction()?;
        {
            let user_repo = SqliteUserRepository::new(&tx);
            for user in &users {
                user_repo.insert_user(user)?;
            }
            let game_repo = SqliteGameRepository::new(&tx);
            for game in &games {
                game_repo.insert_game(game)?;
            }
        }
        tx.commit()?;
        Ok(())
    })?;
    store.notify(&[Table::Users, Table::Games]);

    state_file::write_json(
        marker_path,
        &SeedMarker {
            seeded: true,
            seeded_at: now,
        },
    )?;

    info!(
        "event=seed_demo_data module=seed status=ok users={} games={}",
        users.len(),
        games.len()
    );
    Ok(SeedOutcome::Seeded {
        users: users.len(),
        games: games.len(),
    })
}
