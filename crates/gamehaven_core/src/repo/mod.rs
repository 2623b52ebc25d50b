//! Query layer: one access object per entity.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Isolate SQLite query details from facades and services.
//!
//! # Invariants
//! - Repositories never validate caller input; they persist what they get.
//! - Point lookups return `Option`; id-targeted writes that match no row
//!   return `RepoError::NotFound`.
//! - List queries are ordered by recency (newest first).

use crate::db::DbError;
use rusqlite::{Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod download_history_repo;
pub mod game_repo;
pub mod purchased_game_repo;
pub mod transaction_detail_repo;
pub mod transaction_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for storefront persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying store failed (unavailable, corrupted, constraint violation).
    Db(DbError),
    /// Id-targeted write matched no row.
    NotFound { entity: &'static str, id: i64 },
    /// A persisted value could not be mapped back to the domain model.
    InvalidData(String),
    /// The store handle could not run the call (worker died or lock poisoned).
    StoreUnavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::StoreUnavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) | Self::StoreUnavailable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Builds the `%term%` pattern used by substring searches.
///
/// `LIKE` is ASCII case-insensitive in SQLite, which is the matching contract
/// for every search query.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Collects every row of a prepared query through `parse`.
pub(crate) fn collect_rows<T, P>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>>
where
    P: rusqlite::Params,
{
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }
    Ok(items)
}

/// Reads at most one row of a prepared query through `parse`.
pub(crate) fn first_row<T, P>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Option<T>>
where
    P: rusqlite::Params,
{
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(parse(row)?)),
        None => Ok(None),
    }
}

pub(crate) fn count(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> RepoResult<i64> {
    Ok(conn.query_row(sql, params, |row| row.get::<_, i64>(0))?)
}

/// Maps the row count of an id-targeted write to `NotFound` when zero.
pub(crate) fn expect_changed(changed: usize, entity: &'static str, id: i64) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound { entity, id });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("cyber"), "%cyber%");
        assert_eq!(like_pattern("100%_off"), "%100\\%\\_off%");
    }
}
