use gamehaven_core::db::open_db_in_memory;
use gamehaven_core::repo::download_history_repo::{
    DownloadHistoryRepository, SqliteDownloadHistoryRepository,
};
use gamehaven_core::repo::game_repo::{GameRepository, SqliteGameRepository};
use gamehaven_core::repo::purchased_game_repo::{
    PurchasedGameRepository, SqlitePurchasedGameRepository,
};
use gamehaven_core::repo::transaction_detail_repo::{
    SqliteTransactionDetailRepository, TransactionDetailRepository,
};
use gamehaven_core::repo::transaction_repo::{SqliteTransactionRepository, TransactionRepository};
use gamehaven_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use gamehaven_core::service::purchase_service::PurchaseService;
use gamehaven_core::{
    DateRange, DownloadHistory, DownloadStatus, Game, GameId, PurchaseRequest, RepoError,
    TransactionDetail, User, UserId, UserRole,
};
use rusqlite::Connection;

const PURCHASE_DATE: i64 = 1_700_000_000_000;

fn seed(conn: &Connection) -> (UserId, UserId, GameId, GameId) {
    let users = SqliteUserRepository::new(conn);
    let farr = users
        .insert_user(&User::new("Farr", "farr@gmail.com", "123", UserRole::Admin))
        .unwrap();
    let shir = users
        .insert_user(&User::new("shir", "shir@gmail.com", "123", UserRole::Regular))
        .unwrap();
    let games = SqliteGameRepository::new(conn);
    let cyber = games
        .insert_game(&Game::new("Cyber Jump", 25_000.0, 100))
        .unwrap();
    let zombie = games
        .insert_game(&Game::new("Zombie Arena", 40_000.0, 50))
        .unwrap();
    (farr, shir, cyber, zombie)
}

#[test]
fn single_game_purchase_creates_header_detail_and_library_entry() {
    let mut conn = open_db_in_memory().unwrap();
    let (user_id, _, _, game_id) = seed(&conn);
    assert_eq!((user_id, game_id), (1, 2));

    let game = SqliteGameRepository::new(&conn)
        .get_game(game_id)
        .unwrap()
        .unwrap();
    let request = PurchaseRequest::single_game(user_id, &game, PURCHASE_DATE);
    let receipt = PurchaseService::new(&mut conn)
        .record_purchase(&request)
        .unwrap();

    let header = SqliteTransactionRepository::new(&conn)
        .get_transaction(receipt.transaction_id)
        .unwrap()
        .unwrap();
    assert_eq!(header.user_id, 1);
    assert_eq!(header.total_price, 40_000.0);
    assert_eq!(header.date, PURCHASE_DATE);

    let details = SqliteTransactionDetailRepository::new(&conn)
        .list_details_by_transaction(receipt.transaction_id)
        .unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].game_id, 2);
    assert_eq!(details[0].qty, 1);
    assert_eq!(details[0].transaction_id, receipt.transaction_id);

    let library = SqlitePurchasedGameRepository::new(&conn);
    let owned = library.find_by_user_and_game(1, 2).unwrap().unwrap();
    assert_eq!(owned.transaction_id, receipt.transaction_id);
    assert_eq!(owned.purchase_date, PURCHASE_DATE);
    assert_eq!(owned.download_status, DownloadStatus::NotDownloaded);
    assert_eq!(receipt.purchased_game_ids, vec![owned.id]);
}

#[test]
fn multi_line_purchase_creates_one_library_entry_per_line() {
    let mut conn = open_db_in_memory().unwrap();
    let (_, shir, cyber, zombie) = seed(&conn);

    let request = PurchaseRequest::from_lines(
        shir,
        PURCHASE_DATE,
        vec![
            TransactionDetail::pending(cyber, 25_000.0, 1),
            TransactionDetail::pending(zombie, 40_000.0, 2),
        ],
    );
    assert_eq!(request.total_price, 105_000.0);

    let receipt = PurchaseService::new(&mut conn)
        .record_purchase(&request)
        .unwrap();
    assert_eq!(receipt.detail_ids.len(), 2);
    assert_eq!(receipt.purchased_game_ids.len(), 2);

    let library = SqlitePurchasedGameRepository::new(&conn);
    assert_eq!(library.count_by_user(shir).unwrap(), 2);
    assert!(library
        .list_by_user(shir)
        .unwrap()
        .iter()
        .all(|entry| entry.transaction_id == receipt.transaction_id));
}

#[test]
fn failed_purchase_leaves_no_partial_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let (farr, _, cyber, _) = seed(&conn);

    let request = PurchaseRequest::from_lines(
        farr,
        PURCHASE_DATE,
        vec![
            TransactionDetail::pending(cyber, 25_000.0, 1),
            TransactionDetail::pending(999, 1.0, 1),
        ],
    );
    let err = PurchaseService::new(&mut conn)
        .record_purchase(&request)
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    assert!(SqliteTransactionRepository::new(&conn)
        .list_transactions()
        .unwrap()
        .is_empty());
    assert_eq!(
        SqlitePurchasedGameRepository::new(&conn)
            .count_by_user(farr)
            .unwrap(),
        0
    );
}

#[test]
fn deleting_user_cascades_purchases_but_keeps_download_history() {
    let mut conn = open_db_in_memory().unwrap();
    let (_, shir, cyber, _) = seed(&conn);
    let game = SqliteGameRepository::new(&conn)
        .get_game(cyber)
        .unwrap()
        .unwrap();
    let receipt = PurchaseService::new(&mut conn)
        .record_purchase(&PurchaseRequest::single_game(shir, &game, PURCHASE_DATE))
        .unwrap();
    let history_id = SqliteDownloadHistoryRepository::new(&conn)
        .insert_history(&DownloadHistory::new(shir, cyber, PURCHASE_DATE + 1))
        .unwrap();

    SqliteUserRepository::new(&conn).delete_user(shir).unwrap();

    assert!(SqliteTransactionRepository::new(&conn)
        .get_transaction(receipt.transaction_id)
        .unwrap()
        .is_none());
    assert!(SqliteTransactionDetailRepository::new(&conn)
        .list_details_by_transaction(receipt.transaction_id)
        .unwrap()
        .is_empty());
    assert_eq!(
        SqlitePurchasedGameRepository::new(&conn)
            .count_by_user(shir)
            .unwrap(),
        0
    );

    let history = SqliteDownloadHistoryRepository::new(&conn)
        .list_by_user(shir)
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, history_id);
}

#[test]
fn deleting_game_removes_its_lines_and_library_entries_only() {
    let mut conn = open_db_in_memory().unwrap();
    let (farr, _, cyber, zombie) = seed(&conn);
    let receipt = PurchaseService::new(&mut conn)
        .record_purchase(&PurchaseRequest::from_lines(
            farr,
            PURCHASE_DATE,
            vec![
                TransactionDetail::pending(cyber, 25_000.0, 1),
                TransactionDetail::pending(zombie, 40_000.0, 1),
            ],
        ))
        .unwrap();

    SqliteGameRepository::new(&conn).delete_game(zombie).unwrap();

    let details = SqliteTransactionDetailRepository::new(&conn)
        .list_details_by_transaction(receipt.transaction_id)
        .unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].game_id, cyber);

    let library = SqlitePurchasedGameRepository::new(&conn);
    assert!(library.find_by_user_and_game(farr, zombie).unwrap().is_none());
    assert!(library.find_by_user_and_game(farr, cyber).unwrap().is_some());

    let header = SqliteTransactionRepository::new(&conn)
        .get_transaction(receipt.transaction_id)
        .unwrap()
        .unwrap();
    assert_eq!(header.total_price, 65_000.0);
}

#[test]
fn sales_summary_respects_half_open_range() {
    let mut conn = open_db_in_memory().unwrap();
    let (farr, shir, cyber, zombie) = seed(&conn);
    let games = SqliteGameRepository::new(&conn);
    let cyber = games.get_game(cyber).unwrap().unwrap();
    let zombie = games.get_game(zombie).unwrap().unwrap();

    let mut service = PurchaseService::new(&mut conn);
    service
        .record_purchase(&PurchaseRequest::single_game(farr, &cyber, 1_000))
        .unwrap();
    service
        .record_purchase(&PurchaseRequest::single_game(shir, &zombie, 2_000))
        .unwrap();
    service
        .record_purchase(&PurchaseRequest::single_game(shir, &cyber, 3_000))
        .unwrap();

    let repo = SqliteTransactionRepository::new(&conn);
    let all = repo.sales_summary(DateRange::all()).unwrap();
    assert_eq!(all.transaction_count, 3);
    assert_eq!(all.revenue, 90_000.0);
    assert_eq!(all.average_transaction, 30_000.0);

    let window = DateRange {
        since: Some(2_000),
        until: Some(3_000),
    };
    let summary = repo.sales_summary(window).unwrap();
    assert_eq!(summary.transaction_count, 1);
    assert_eq!(summary.revenue, 40_000.0);

    let dates: Vec<i64> = repo
        .list_transactions_by_user(shir)
        .unwrap()
        .iter()
        .map(|tx| tx.date)
        .collect();
    assert_eq!(dates, vec![3_000, 2_000]);

    let empty = repo
        .sales_summary(DateRange {
            since: Some(10_000),
            until: None,
        })
        .unwrap();
    assert_eq!(empty.transaction_count, 0);
    assert_eq!(empty.revenue, 0.0);
    assert_eq!(empty.average_transaction, 0.0);
}
