//! Transaction line-item repository.

use super::{collect_rows, expect_changed, RepoResult};
use crate::model::transaction::{TransactionDetail, TransactionDetailId, TransactionId};
use rusqlite::{params, Connection, Row};

/// Repository interface for sale lines.
pub trait TransactionDetailRepository {
    fn insert_detail(&self, detail: &TransactionDetail) -> RepoResult<TransactionDetailId>;
    /// Inserts every line under `transaction_id`, ignoring each line's own
    /// `transaction_id`. Returns generated ids in input order.
    fn insert_details(
        &self,
        transaction_id: TransactionId,
        details: &[TransactionDetail],
    ) -> RepoResult<Vec<TransactionDetailId>>;
    fn list_details_by_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> RepoResult<Vec<TransactionDetail>>;
    fn delete_detail(&self, id: TransactionDetailId) -> RepoResult<()>;
}

/// SQLite-backed line-item repository.
pub struct SqliteTransactionDetailRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTransactionDetailRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TransactionDetailRepository for SqliteTransactionDetailRepository<'_> {
    fn insert_detail(&self, detail: &TransactionDetail) -> RepoResult<TransactionDetailId> {
        self.conn.execute(
            "INSERT INTO transaction_details (transaction_id, game_id, price, qty)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                detail.transaction_id,
                detail.game_id,
                detail.price,
                detail.qty
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_details(
        &self,
        transaction_id: TransactionId,
        details: &[TransactionDetail],
    ) -> RepoResult<Vec<TransactionDetailId>> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO transaction_details (transaction_id, game_id, price, qty)
             VALUES (?1, ?2, ?3, ?4);",
        )?;
        let mut ids = Vec::with_capacity(details.len());
        for detail in details {
            stmt.execute(params![
                transaction_id,
                detail.game_id,
                detail.price,
                detail.qty
            ])?;
            ids.push(self.conn.last_insert_rowid());
        }
        Ok(ids)
    }

    fn list_details_by_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> RepoResult<Vec<TransactionDetail>> {
        collect_rows(
            self.conn,
            "SELECT id, transaction_id, game_id, price, qty
             FROM transaction_details
             WHERE transaction_id = ?1
             ORDER BY id ASC;",
            [transaction_id],
            parse_detail_row,
        )
    }

    fn delete_detail(&self, id: TransactionDetailId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM transaction_details WHERE id = ?1;", [id])?;
        expect_changed(changed, "transaction detail", id)
    }
}

fn parse_detail_row(row: &Row<'_>) -> RepoResult<TransactionDetail> {
    Ok(TransactionDetail {
        id: row.get("id")?,
        transaction_id: row.get("transaction_id")?,
        game_id: row.get("game_id")?,
        price: row.get("price")?,
        qty: row.get("qty")?,
    })
}
