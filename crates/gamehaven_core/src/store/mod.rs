//! Explicit storage handle shared by all facades.
//!
//! # Responsibility
//! - Own the single SQLite connection of the application.
//! - Run repository closures off the async executor threads.
//! - Publish touched tables after each successful write and drive
//!   [`LiveQuery`] refreshes from those notifications.
//!
//! # Invariants
//! - Every call holds the connection lock for its whole closure, so one
//!   closure is one unit of work against storage.
//! - Notifications are published only after the write closure returned `Ok`,
//!   from the blocking worker, even when the awaiting caller went away.
//! - A live query subscribes to changes before its first read, so no write
//!   committed after subscription is missed.

mod changes;
mod live;

pub use changes::{
    Table, DOWNLOAD_STATUS_TABLES, GAME_DELETE_TABLES, PURCHASE_TABLES, USER_DELETE_TABLES,
};
pub use live::LiveQuery;

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::repo::{RepoError, RepoResult};
use log::{debug, warn};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::{broadcast, watch};

/// Default capacity of the change bus before slow subscribers start lagging.
pub const DEFAULT_CHANGE_CAPACITY: usize = 64;

/// Cloneable handle to the application's relational store.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    conn: Mutex<Connection>,
    changes: broadcast::Sender<Table>,
}

impl StoreInner {
    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RepoError::StoreUnavailable("connection lock poisoned".to_string()))
    }

    fn publish(&self, tables: &[Table]) {
        for table in tables {
            // No subscribers is not an error.
            let _ = self.changes.send(*table);
        }
    }
}

impl Store {
    /// Opens the database file at `path` (schema ensured).
    pub fn open(path: impl AsRef<Path>, change_capacity: usize) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?, change_capacity))
    }

    /// Opens a private in-memory store, mostly for tests.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(
            open_db_in_memory()?,
            DEFAULT_CHANGE_CAPACITY,
        ))
    }

    /// Wraps an already bootstrapped connection.
    pub fn from_connection(conn: Connection, change_capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(change_capacity.max(1));
        Self {
            inner: Arc::new(StoreInner {
                conn: Mutex::new(conn),
                changes,
            }),
        }
    }

    /// Runs a read-only closure on a blocking worker.
    pub async fn read<T, F>(&self, op: F) -> RepoResult<T>
    where
        F: FnOnce(&Connection) -> RepoResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        run_blocking(move || {
            let conn = inner.lock()?;
            op(&*conn)
        })
        .await
    }

    /// Runs a writing closure on a blocking worker and publishes `touched`
    /// when it succeeds.
    ///
    /// Publishing happens on the worker, so a caller that drops this future
    /// mid-write still leaves live queries consistent with the commit.
    pub async fn write<T, F>(&self, touched: &'static [Table], op: F) -> RepoResult<T>
    where
        F: FnOnce(&mut Connection) -> RepoResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        run_blocking(move || {
            let value = {
                let mut conn = inner.lock()?;
                op(&mut *conn)?
            };
            inner.publish(touched);
            Ok(value)
        })
        .await
    }

    /// Synchronous access for bootstrap code running outside an executor.
    ///
    /// Does not publish changes; call [`Store::notify`] when it wrote rows
    /// that live queries may be watching.
    pub fn with_connection<T>(
        &self,
        op: impl FnOnce(&mut Connection) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let mut conn = self.inner.lock()?;
        op(&mut *conn)
    }

    /// Publishes `tables` on the change bus.
    pub fn notify(&self, tables: &[Table]) {
        self.inner.publish(tables);
    }

    pub fn subscribe_changes(&self) -> broadcast::Receiver<Table> {
        self.inner.changes.subscribe()
    }

    /// Runs `query` now and again after every write touching `watched`.
    ///
    /// # Errors
    /// - Returns the first execution's error. Later refresh failures are
    ///   logged and the previous result is kept.
    pub async fn live<T, F>(&self, watched: &'static [Table], query: F) -> RepoResult<LiveQuery<T>>
    where
        F: Fn(&Connection) -> RepoResult<T> + Send + Sync + 'static,
        T: Clone + Send + Sync + 'static,
    {
        let query = Arc::new(query);
        let mut changes = self.subscribe_changes();

        let first = Arc::clone(&query);
        let initial = self.read(move |conn| (*first)(conn)).await?;
        let (tx, rx) = watch::channel(initial);

        let store = self.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    received = changes.recv() => {
                        match received {
                            Ok(table) if !watched.contains(&table) => continue,
                            Ok(_) | Err(RecvError::Lagged(_)) => {}
                            Err(RecvError::Closed) => break,
                        }
                        // One refresh covers every notification already queued.
                        loop {
                            match changes.try_recv() {
                                Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                                Err(_) => break,
                            }
                        }

                        let refresh = Arc::clone(&query);
                        match store.read(move |conn| (*refresh)(conn)).await {
                            Ok(value) => {
                                if tx.send(value).is_err() {
                                    break;
                                }
                            }
                            Err(err) => warn!(
                                "event=live_query_refresh module=store status=error error={}",
                                err
                            ),
                        }
                    }
                }
            }
            debug!("event=live_query_stop module=store status=ok");
        });

        Ok(LiveQuery::new(rx, task))
    }
}

async fn run_blocking<T, F>(op: F) -> RepoResult<T>
where
    F: FnOnce() -> RepoResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(result) => result,
        Err(err) => Err(RepoError::StoreUnavailable(format!(
            "storage worker failed: {err}"
        ))),
    }
}
