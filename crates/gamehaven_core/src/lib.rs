//! Core persistence and domain logic for the GameHaven storefront.
//! This crate is the single source of truth for stored records and their invariants.

pub mod app;
pub mod config;
pub mod db;
pub mod facade;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;
pub mod session;
mod state_file;
pub mod store;

pub use app::{AdminDashboard, App, AppError};
pub use config::{AppConfig, ConfigError};
pub use facade::{
    DownloadHistoryFacade, GameFacade, InventoryStats, LibraryFacade, TransactionFacade,
    UserFacade, UserStats,
};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::download_history::{DownloadHistory, DownloadHistoryId};
pub use model::game::{Game, GameId};
pub use model::purchased_game::{DownloadStatus, PurchasedGame, PurchasedGameId};
pub use model::transaction::{
    DateRange, SalesSummary, Transaction, TransactionDetail, TransactionDetailId, TransactionId,
};
pub use model::user::{User, UserId, UserRole};
pub use repo::{RepoError, RepoResult};
pub use seed::{seed_if_first_run, SeedError, SeedOutcome};
pub use service::library_service::StatusChange;
pub use service::purchase_service::{PurchaseReceipt, PurchaseRequest};
pub use session::{Session, SessionStore};
pub use state_file::StateFileError;
pub use store::{LiveQuery, Store, Table};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
