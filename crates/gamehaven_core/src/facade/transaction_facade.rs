//! Sales facade: checkout recording and analytics.

use crate::model::transaction::{
    DateRange, SalesSummary, Transaction, TransactionDetail, TransactionId,
};
use crate::model::user::UserId;
use crate::repo::transaction_detail_repo::{
    SqliteTransactionDetailRepository, TransactionDetailRepository,
};
use crate::repo::transaction_repo::{SqliteTransactionRepository, TransactionRepository};
use crate::repo::RepoResult;
use crate::service::purchase_service::{PurchaseReceipt, PurchaseRequest, PurchaseService};
use crate::store::{LiveQuery, Store, Table, PURCHASE_TABLES};

#[derive(Clone)]
pub struct TransactionFacade {
    store: Store,
}

impl TransactionFacade {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Records a completed payment with its lines and library entries.
    pub async fn record_purchase(&self, request: PurchaseRequest) -> RepoResult<PurchaseReceipt> {
        self.store
            .write(PURCHASE_TABLES, move |conn| {
                PurchaseService::new(conn).record_purchase(&request)
            })
            .await
    }

    pub async fn get(&self, id: TransactionId) -> RepoResult<Option<Transaction>> {
        self.store
            .read(move |conn| SqliteTransactionRepository::new(conn).get_transaction(id))
            .await
    }

    pub async fn sales_summary(&self, range: DateRange) -> RepoResult<SalesSummary> {
        self.store
            .read(move |conn| SqliteTransactionRepository::new(conn).sales_summary(range))
            .await
    }

    pub async fn all_transactions(&self) -> RepoResult<LiveQuery<Vec<Transaction>>> {
        self.store
            .live(&[Table::Transactions], |conn| {
                SqliteTransactionRepository::new(conn).list_transactions()
            })
            .await
    }

    pub async fn transactions_in_range(
        &self,
        range: DateRange,
    ) -> RepoResult<LiveQuery<Vec<Transaction>>> {
        self.store
            .live(&[Table::Transactions], move |conn| {
                SqliteTransactionRepository::new(conn).list_transactions_in_range(range)
            })
            .await
    }

    pub async fn transactions_by_user(
        &self,
        user_id: UserId,
    ) -> RepoResult<LiveQuery<Vec<Transaction>>> {
        self.store
            .live(&[Table::Transactions], move |conn| {
                SqliteTransactionRepository::new(conn).list_transactions_by_user(user_id)
            })
            .await
    }

    pub async fn details(
        &self,
        transaction_id: TransactionId,
    ) -> RepoResult<LiveQuery<Vec<TransactionDetail>>> {
        self.store
            .live(&[Table::TransactionDetails], move |conn| {
                SqliteTransactionDetailRepository::new(conn)
                    .list_details_by_transaction(transaction_id)
            })
            .await
    }
}
