//! Composition root: builds the store, facades and session store from one
//! [`AppConfig`] and owns them for the lifetime of the host application.
//!
//! # Invariants
//! - Exactly one [`Store`] per `App`; every facade shares it.
//! - Seeding (when enabled) completes before `App::open` returns.

use crate::config::{AppConfig, ConfigError};
use crate::db::DbError;
use crate::facade::{
    DownloadHistoryFacade, GameFacade, InventoryStats, LibraryFacade, TransactionFacade,
    UserFacade, UserStats,
};
use crate::logging::{init_logging, LoggingError};
use crate::model::game::{Game, GameId};
use crate::model::now_epoch_ms;
use crate::model::transaction::{DateRange, SalesSummary};
use crate::repo::RepoError;
use crate::seed::{seed_if_first_run, SeedError, SeedOutcome};
use crate::service::purchase_service::{PurchaseReceipt, PurchaseRequest};
use crate::session::{Session, SessionStore};
use crate::state_file::StateFileError;
use crate::store::{LiveQuery, Store};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Logging(LoggingError),
    DataDir(std::io::Error),
    Db(DbError),
    Repo(RepoError),
    StateFile(StateFileError),
    Seed(SeedError),
    /// The operation needs a logged-in user.
    NotLoggedIn,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::DataDir(err) => write!(f, "failed to prepare data directory: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::StateFile(err) => write!(f, "{err}"),
            Self::Seed(err) => write!(f, "{err}"),
            Self::NotLoggedIn => write!(f, "no user is logged in"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::DataDir(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::StateFile(err) => Some(err),
            Self::Seed(err) => Some(err),
            Self::NotLoggedIn => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for AppError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for AppError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<StateFileError> for AppError {
    fn from(value: StateFileError) -> Self {
        Self::StateFile(value)
    }
}

impl From<SeedError> for AppError {
    fn from(value: SeedError) -> Self {
        Self::Seed(value)
    }
}

/// Figures for the admin home and analytics screens.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdminDashboard {
    pub users: UserStats,
    pub inventory: InventoryStats,
    pub sales: SalesSummary,
}

pub struct App {
    config: AppConfig,
    store: Store,
    session: SessionStore,
    users: UserFacade,
    games: GameFacade,
    transactions: TransactionFacade,
    library: LibraryFacade,
    downloads: DownloadHistoryFacade,
    seed_outcome: Option<SeedOutcome>,
}

impl App {
    /// Opens (or creates) every store under `config.data_dir`.
    ///
    /// Starts file logging first when `config.log_level` is set.
    pub fn open(config: AppConfig) -> Result<Self, AppError> {
        config.validate()?;
        std::fs::create_dir_all(&config.data_dir).map_err(AppError::DataDir)?;

        if let Some(level) = config.log_level.as_deref() {
            init_logging(level, config.log_dir())?;
        }

        let store = Store::open(config.db_path(), config.change_capacity)?;
        Self::assemble(config, store)
    }

    /// Builds an `App` over an existing store; session and seed marker files
    /// still live under `config.data_dir`.
    pub fn with_store(config: AppConfig, store: Store) -> Result<Self, AppError> {
        config.validate()?;
        std::fs::create_dir_all(&config.data_dir).map_err(AppError::DataDir)?;
        Self::assemble(config, store)
    }

    fn assemble(config: AppConfig, store: Store) -> Result<Self, AppError> {
        let seed_outcome = if config.seed_demo_data {
            Some(seed_if_first_run(&store, &config.seed_marker_path())?)
        } else {
            None
        };

        Ok(Self {
            session: SessionStore::new(config.session_path()),
            users: UserFacade::new(store.clone()),
            games: GameFacade::new(store.clone()),
            transactions: TransactionFacade::new(store.clone()),
            library: LibraryFacade::new(store.clone()),
            downloads: DownloadHistoryFacade::new(store.clone()),
            store,
            config,
            seed_outcome,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.session
    }

    pub fn users(&self) -> &UserFacade {
        &self.users
    }

    pub fn games(&self) -> &GameFacade {
        &self.games
    }

    pub fn transactions(&self) -> &TransactionFacade {
        &self.transactions
    }

    pub fn library(&self) -> &LibraryFacade {
        &self.library
    }

    pub fn downloads(&self) -> &DownloadHistoryFacade {
        &self.downloads
    }

    /// `None` when seeding is disabled.
    pub fn seed_outcome(&self) -> Option<SeedOutcome> {
        self.seed_outcome
    }

    /// Checks credentials and persists the session on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<Session>, AppError> {
        let Some(user) = self.users.login(email, password).await? else {
            return Ok(None);
        };
        let session = Session::from(&user);
        self.session.save(&session)?;
        Ok(Some(session))
    }

    pub fn logout(&self) -> Result<(), AppError> {
        Ok(self.session.logout()?)
    }

    pub fn current_session(&self) -> Result<Option<Session>, AppError> {
        Ok(self.session.load()?)
    }

    /// Buys one copy of `game_id` at its current price for `session`'s user.
    ///
    /// # Errors
    /// - `AppError::Repo(RepoError::NotFound)` when the game does not exist.
    pub async fn purchase_game(
        &self,
        session: &Session,
        game_id: GameId,
    ) -> Result<PurchaseReceipt, AppError> {
        let game: Game = self
            .games
            .get(game_id)
            .await?
            .ok_or(RepoError::NotFound {
                entity: "game",
                id: game_id,
            })?;
        let request = PurchaseRequest::single_game(session.user_id, &game, now_epoch_ms());
        Ok(self.transactions.record_purchase(request).await?)
    }

    /// Same as [`App::purchase_game`] for the persisted session.
    pub async fn purchase_for_current_user(
        &self,
        game_id: GameId,
    ) -> Result<PurchaseReceipt, AppError> {
        let session = self.current_session()?.ok_or(AppError::NotLoggedIn)?;
        self.purchase_game(&session, game_id).await
    }

    pub async fn dashboard(&self, range: DateRange) -> Result<AdminDashboard, AppError> {
        Ok(AdminDashboard {
            users: self.users.stats().await?,
            inventory: self.games.stats().await?,
            sales: self.transactions.sales_summary(range).await?,
        })
    }

    /// Low-stock listing using the configured threshold.
    pub async fn low_stock_games(&self) -> Result<LiveQuery<Vec<Game>>, AppError> {
        Ok(self
            .games
            .low_stock(Some(self.config.low_stock_threshold))
            .await?)
    }
}
