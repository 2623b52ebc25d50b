//! Application facades: async, observable entry points for the presentation
//! layer.
//!
//! # Responsibility
//! - Expose one facade per entity over a shared [`Store`](crate::store::Store).
//! - Turn list queries into [`LiveQuery`](crate::store::LiveQuery) streams.
//! - Publish the tables each write touches so subscribers re-deliver.
//!
//! # Invariants
//! - Facades hold no state besides the store handle; cloning is cheap.
//! - Not-found lookups return `Ok(None)`; storage failures propagate as-is.

pub mod download_history_facade;
pub mod game_facade;
pub mod library_facade;
pub mod transaction_facade;
pub mod user_facade;

pub use download_history_facade::DownloadHistoryFacade;
pub use game_facade::{GameFacade, InventoryStats};
pub use library_facade::LibraryFacade;
pub use transaction_facade::TransactionFacade;
pub use user_facade::{UserFacade, UserStats};
