//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple: envelopes carry `ok` plus a message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One [`App`] per process, bound to the first `data_dir` passed to
//!   [`init_store`].
//! - Envelopes never carry passwords.

use gamehaven_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AdminDashboard, App, AppConfig, AppError, DateRange, DownloadStatus, Game, PurchasedGame,
    Session,
};
use log::warn;
use once_cell::sync::OnceCell;
use std::future::Future;
use std::path::PathBuf;
use std::sync::OnceLock;
use tokio::runtime::Runtime;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const DASHBOARD_DEFAULT_DAYS: u32 = 30;
const DASHBOARD_DAYS_MAX: u32 = 365;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();
static APP: OnceCell<App> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Opens the storefront store under `data_dir`, seeding demo data on first run.
///
/// # FFI contract
/// - Sync call; opens or creates the database file.
/// - Idempotent for the same `data_dir`; a different one returns an error.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(data_dir: String) -> String {
    let data_dir = PathBuf::from(data_dir.trim());
    // Concurrent first callers block here until the single open finishes.
    let opened = APP.get_or_try_init(|| App::open(AppConfig::for_data_dir(data_dir.clone())));
    let app = match opened {
        Ok(app) => app,
        Err(err) => return format!("init_store failed: {err}"),
    };
    if app.config().data_dir == data_dir {
        String::new()
    } else {
        format!(
            "store already initialized at `{}`",
            app.config().data_dir.display()
        )
    }
}

/// Session projection returned to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionItem {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    /// `true` for admin accounts.
    pub is_admin: bool,
}

/// Login response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub ok: bool,
    /// Present when credentials matched.
    pub session: Option<SessionItem>,
    pub message: String,
}

/// Catalog entry returned to Dart.
#[derive(Debug, Clone, PartialEq)]
pub struct GameItem {
    pub game_id: i64,
    pub title: String,
    pub description: String,
    pub developer: String,
    pub category: String,
    pub price: f64,
    pub release_date: Option<i64>,
    pub stock: i64,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameListResponse {
    pub items: Vec<GameItem>,
    pub message: String,
}

/// Library entry returned to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryItem {
    pub purchased_game_id: i64,
    pub game_id: i64,
    pub purchase_date: i64,
    /// `not_downloaded|downloading|downloaded|installed`.
    pub download_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryResponse {
    pub items: Vec<LibraryItem>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the created or updated record.
    pub id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: i64) -> Self {
        Self {
            ok: true,
            id: Some(id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Admin analytics envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardResponse {
    pub ok: bool,
    pub total_users: i64,
    pub admin_users: i64,
    pub regular_users: i64,
    pub total_games: i64,
    pub available_games: i64,
    pub out_of_stock_games: i64,
    pub inventory_value: f64,
    pub revenue: f64,
    pub transaction_count: i64,
    pub average_transaction: f64,
    /// Effective trailing window in days.
    pub applied_days: u32,
    pub message: String,
}

/// Checks credentials and persists the session on success.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Wrong credentials return `ok=false` with no session.
#[flutter_rust_bridge::frb(sync)]
pub fn login(email: String, password: String) -> LoginResponse {
    let result = with_app(|app| async move { app.login(email.trim(), &password).await });
    match result {
        Ok(Some(session)) => LoginResponse {
            ok: true,
            session: Some(to_session_item(&session)),
            message: "Logged in.".to_string(),
        },
        Ok(None) => LoginResponse {
            ok: false,
            session: None,
            message: "Invalid email or password.".to_string(),
        },
        Err(err) => LoginResponse {
            ok: false,
            session: None,
            message: format!("login failed: {err}"),
        },
    }
}

/// Clears the persisted session. Returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn logout() -> String {
    match app().and_then(|app| app.logout().map_err(|err| err.to_string())) {
        Ok(()) => String::new(),
        Err(err) => format!("logout failed: {err}"),
    }
}

/// Returns the persisted session, `None` when logged out or not initialized.
#[flutter_rust_bridge::frb(sync)]
pub fn current_session() -> Option<SessionItem> {
    let app = app().ok()?;
    match app.current_session() {
        Ok(session) => session.as_ref().map(to_session_item),
        Err(err) => {
            warn!("event=ffi_current_session module=ffi status=error error={err}");
            None
        }
    }
}

/// Lists the catalog, newest first. A non-blank `search` filters by title,
/// developer or category (case-insensitive substring).
#[flutter_rust_bridge::frb(sync)]
pub fn list_games(search: Option<String>) -> GameListResponse {
    let term = search
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let result = with_app(|app| async move {
        let games = match term {
            Some(term) => app.games().search_games(term).await?,
            None => app.games().list_games().await?,
        };
        Ok::<_, AppError>(games)
    });
    match result {
        Ok(games) => {
            let items = games.iter().map(to_game_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No games.".to_string()
            } else {
                format!("Found {} game(s).", items.len())
            };
            GameListResponse { items, message }
        }
        Err(err) => GameListResponse {
            items: Vec::new(),
            message: format!("list_games failed: {err}"),
        },
    }
}

/// Buys one copy of `game_id` for the logged-in user.
///
/// Returns the transaction id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn purchase_game(game_id: i64) -> ActionResponse {
    match with_app(|app| async move { app.purchase_for_current_user(game_id).await }) {
        Ok(receipt) => ActionResponse::success("Purchase recorded.", receipt.transaction_id),
        Err(err) => ActionResponse::failure(format!("purchase_game failed: {err}")),
    }
}

/// Games owned by the logged-in user, newest purchase first.
#[flutter_rust_bridge::frb(sync)]
pub fn my_library() -> LibraryResponse {
    let result = with_app(|app| async move {
        let session = app
            .current_session()?
            .ok_or(AppError::NotLoggedIn)?;
        let entries = app.library().owned_by(session.user_id).await?;
        Ok::<_, AppError>(entries)
    });
    match result {
        Ok(entries) => LibraryResponse {
            message: format!("Found {} game(s).", entries.len()),
            items: entries.iter().map(to_library_item).collect(),
        },
        Err(err) => LibraryResponse {
            items: Vec::new(),
            message: format!("my_library failed: {err}"),
        },
    }
}

/// Sets the download status of a library entry.
///
/// Input semantics:
/// - `status`: `not_downloaded|downloading|downloaded|installed`.
///
/// Reaching `downloaded` or `installed` also appends a download history row;
/// its id is returned in `id`, otherwise `id` is the library entry id.
#[flutter_rust_bridge::frb(sync)]
pub fn set_download_status(purchased_game_id: i64, status: String) -> ActionResponse {
    let Some(status) = DownloadStatus::parse(status.trim()) else {
        return ActionResponse::failure(format!(
            "set_download_status failed: unsupported status `{}`",
            status.trim()
        ));
    };
    let result = with_app(|app| async move {
        Ok::<_, AppError>(
            app.library()
                .update_download_status(purchased_game_id, status)
                .await?,
        )
    });
    match result {
        Ok(change) => ActionResponse::success(
            format!("Status set to {}.", change.status.as_str()),
            change.history_id.unwrap_or(change.purchased_game_id),
        ),
        Err(err) => ActionResponse::failure(format!("set_download_status failed: {err}")),
    }
}

/// Admin figures over the trailing `days` window (default 30, max 365).
#[flutter_rust_bridge::frb(sync)]
pub fn admin_dashboard(days: Option<u32>) -> DashboardResponse {
    let applied_days = normalize_dashboard_days(days);
    let range = DateRange::trailing(
        gamehaven_core::model::now_epoch_ms(),
        i64::from(applied_days) * DAY_MS,
    );
    match with_app(|app| async move { app.dashboard(range).await }) {
        Ok(dashboard) => to_dashboard_response(&dashboard, applied_days),
        Err(err) => DashboardResponse {
            ok: false,
            applied_days,
            message: format!("admin_dashboard failed: {err}"),
            ..to_dashboard_response(&AdminDashboard::default(), applied_days)
        },
    }
}

fn normalize_dashboard_days(days: Option<u32>) -> u32 {
    match days {
        Some(0) | None => DASHBOARD_DEFAULT_DAYS,
        Some(value) if value > DASHBOARD_DAYS_MAX => DASHBOARD_DAYS_MAX,
        Some(value) => value,
    }
}

fn runtime() -> Result<&'static Runtime, String> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("runtime init failed: {err}"))?;
    let _ = RUNTIME.set(runtime);
    RUNTIME
        .get()
        .ok_or_else(|| "runtime init failed".to_string())
}

fn app() -> Result<&'static App, String> {
    APP.get()
        .ok_or_else(|| "store not initialized; call init_store first".to_string())
}

/// Runs an async use case against the process-wide app on the FFI runtime.
fn with_app<T, F, Fut>(f: F) -> Result<T, String>
where
    F: FnOnce(&'static App) -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let app = app()?;
    let runtime = runtime()?;
    runtime.block_on(f(app)).map_err(|err| err.to_string())
}

fn to_session_item(session: &Session) -> SessionItem {
    SessionItem {
        user_id: session.user_id,
        username: session.username.clone(),
        email: session.email.clone(),
        is_admin: session.is_admin(),
    }
}

fn to_game_item(game: &Game) -> GameItem {
    GameItem {
        game_id: game.id,
        title: game.title.clone(),
        description: game.description.clone(),
        developer: game.developer.clone(),
        category: game.category.clone(),
        price: game.price,
        release_date: game.release_date,
        stock: game.stock,
        image_url: game.image_url.clone(),
    }
}

fn to_library_item(entry: &PurchasedGame) -> LibraryItem {
    LibraryItem {
        purchased_game_id: entry.id,
        game_id: entry.game_id,
        purchase_date: entry.purchase_date,
        download_status: entry.download_status.as_str().to_string(),
    }
}

fn to_dashboard_response(dashboard: &AdminDashboard, applied_days: u32) -> DashboardResponse {
    DashboardResponse {
        ok: true,
        total_users: dashboard.users.total,
        admin_users: dashboard.users.admins,
        regular_users: dashboard.users.regulars,
        total_games: dashboard.inventory.total,
        available_games: dashboard.inventory.available,
        out_of_stock_games: dashboard.inventory.out_of_stock,
        inventory_value: dashboard.inventory.inventory_value,
        revenue: dashboard.sales.revenue,
        transaction_count: dashboard.sales.transaction_count,
        average_transaction: dashboard.sales.average_transaction,
        applied_days,
        message: String::new(),
    }
}
