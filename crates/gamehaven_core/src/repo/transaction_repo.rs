//! Transaction header repository and sales aggregates.

use super::{collect_rows, first_row, RepoResult};
use crate::model::transaction::{DateRange, SalesSummary, Transaction, TransactionId};
use crate::model::user::UserId;
use rusqlite::{params, Connection, Row};

const TRANSACTION_SELECT_SQL: &str = "SELECT id, user_id, total_price, date FROM transactions";

/// Repository interface for sale headers.
pub trait TransactionRepository {
    /// Plain insert; the header's `id` is ignored and the generated id returned.
    fn insert_transaction(&self, transaction: &Transaction) -> RepoResult<TransactionId>;
    fn get_transaction(&self, id: TransactionId) -> RepoResult<Option<Transaction>>;
    /// All transactions, most recent date first.
    fn list_transactions(&self) -> RepoResult<Vec<Transaction>>;
    fn list_transactions_by_user(&self, user_id: UserId) -> RepoResult<Vec<Transaction>>;
    /// Transactions whose `date` falls in `range`, most recent first.
    fn list_transactions_in_range(&self, range: DateRange) -> RepoResult<Vec<Transaction>>;
    /// Revenue, count and average ticket over `range`.
    fn sales_summary(&self, range: DateRange) -> RepoResult<SalesSummary>;
}

/// SQLite-backed transaction repository.
pub struct SqliteTransactionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTransactionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TransactionRepository for SqliteTransactionRepository<'_> {
    fn insert_transaction(&self, transaction: &Transaction) -> RepoResult<TransactionId> {
        self.conn.execute(
            "INSERT INTO transactions (user_id, total_price, date) VALUES (?1, ?2, ?3);",
            params![
                transaction.user_id,
                transaction.total_price,
                transaction.date
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_transaction(&self, id: TransactionId) -> RepoResult<Option<Transaction>> {
        first_row(
            self.conn,
            &format!("{TRANSACTION_SELECT_SQL} WHERE id = ?1;"),
            [id],
            parse_transaction_row,
        )
    }

    fn list_transactions(&self) -> RepoResult<Vec<Transaction>> {
        collect_rows(
            self.conn,
            &format!("{TRANSACTION_SELECT_SQL} ORDER BY date DESC, id DESC;"),
            [],
            parse_transaction_row,
        )
    }

    fn list_transactions_by_user(&self, user_id: UserId) -> RepoResult<Vec<Transaction>> {
        collect_rows(
            self.conn,
            &format!("{TRANSACTION_SELECT_SQL} WHERE user_id = ?1 ORDER BY date DESC, id DESC;"),
            [user_id],
            parse_transaction_row,
        )
    }

    fn list_transactions_in_range(&self, range: DateRange) -> RepoResult<Vec<Transaction>> {
        collect_rows(
            self.conn,
            &format!(
                "{TRANSACTION_SELECT_SQL}
                 WHERE (?1 IS NULL OR date >= ?1)
                   AND (?2 IS NULL OR date < ?2)
                 ORDER BY date DESC, id DESC;"
            ),
            params![range.since, range.until],
            parse_transaction_row,
        )
    }

    fn sales_summary(&self, range: DateRange) -> RepoResult<SalesSummary> {
        let (revenue, transaction_count): (Option<f64>, i64) = self.conn.query_row(
            "SELECT SUM(total_price), COUNT(*)
             FROM transactions
             WHERE (?1 IS NULL OR date >= ?1)
               AND (?2 IS NULL OR date < ?2);",
            params![range.since, range.until],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let revenue = revenue.unwrap_or(0.0);
        let average_transaction = if transaction_count > 0 {
            revenue / transaction_count as f64
        } else {
            0.0
        };

        Ok(SalesSummary {
            revenue,
            transaction_count,
            average_transaction,
        })
    }
}

fn parse_transaction_row(row: &Row<'_>) -> RepoResult<Transaction> {
    Ok(Transaction {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        total_price: row.get("total_price")?,
        date: row.get("date")?,
    })
}
