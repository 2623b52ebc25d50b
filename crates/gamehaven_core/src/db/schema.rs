//! Schema bootstrap with destructive rebuild on version mismatch.
//!
//! # Responsibility
//! - Create the six storefront tables on a fresh database.
//! - Drop and recreate every table when the stored version differs.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A rebuild never keeps rows from the previous shape.
//! - Create/rebuild runs inside one transaction.

use crate::db::DbResult;
use log::{info, warn};
use rusqlite::Connection;

/// Version of the table shapes declared in `schema.sql`.
///
/// Bump on every shape change; existing databases are rebuilt from scratch.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Outcome of [`ensure_schema`], mostly useful for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    /// Stored version already matched.
    Unchanged,
    /// Empty database, tables created.
    Created,
    /// Version mismatch, previous tables dropped and recreated.
    Rebuilt { from_version: u32 },
}

/// Returns the schema version this binary writes.
pub fn latest_version() -> u32 {
    SCHEMA_VERSION
}

/// Brings the connection's schema to [`SCHEMA_VERSION`].
///
/// Must run before `foreign_keys` is enabled so stale tables can be dropped in
/// any order.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<SchemaAction> {
    let current = current_user_version(conn)?;
    if current == SCHEMA_VERSION {
        return Ok(SchemaAction::Unchanged);
    }

    let tx = conn.transaction()?;
    let action = if current == 0 && user_tables(&tx)?.is_empty() {
        SchemaAction::Created
    } else {
        let stale = user_tables(&tx)?;
        warn!(
            "event=schema_rebuild module=db status=start from_version={} to_version={} tables={}",
            current,
            SCHEMA_VERSION,
            stale.len()
        );
        for table in &stale {
            tx.execute_batch(&format!("DROP TABLE IF EXISTS \"{table}\";"))?;
        }
        SchemaAction::Rebuilt {
            from_version: current,
        }
    };

    tx.execute_batch(SCHEMA_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    info!(
        "event=schema_ready module=db status=ok version={} action={:?}",
        SCHEMA_VERSION, action
    );
    Ok(action)
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn user_tables(conn: &Connection) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name
         FROM sqlite_master
         WHERE type = 'table'
           AND name NOT LIKE 'sqlite_%'
         ORDER BY name ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = Vec::new();
    while let Some(row) = rows.next()? {
        tables.push(row.get::<_, String>(0)?);
    }
    Ok(tables)
}
