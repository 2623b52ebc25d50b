use gamehaven_core::db::open_db_in_memory;
use gamehaven_core::model::now_epoch_ms;
use gamehaven_core::repo::download_history_repo::{
    DownloadHistoryRepository, SqliteDownloadHistoryRepository,
};
use gamehaven_core::repo::game_repo::{GameRepository, SqliteGameRepository};
use gamehaven_core::repo::purchased_game_repo::{
    PurchasedGameRepository, SqlitePurchasedGameRepository,
};
use gamehaven_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use gamehaven_core::service::library_service::LibraryService;
use gamehaven_core::service::purchase_service::PurchaseService;
use gamehaven_core::{
    DownloadStatus, Game, PurchaseRequest, PurchasedGameId, RepoError, User, UserId, UserRole,
};
use rusqlite::Connection;

fn owned_game(conn: &mut Connection) -> (UserId, PurchasedGameId) {
    let user_id = SqliteUserRepository::new(conn)
        .insert_user(&User::new("shir", "shir@gmail.com", "123", UserRole::Regular))
        .unwrap();
    let games = SqliteGameRepository::new(conn);
    let game_id = games
        .insert_game(&Game::new("Puzzle Quest", 15_000.0, 200))
        .unwrap();
    let game = games.get_game(game_id).unwrap().unwrap();
    let receipt = PurchaseService::new(conn)
        .record_purchase(&PurchaseRequest::single_game(user_id, &game, 1_000))
        .unwrap();
    (user_id, receipt.purchased_game_ids[0])
}

#[test]
fn downloaded_appends_exactly_one_history_row() {
    let mut conn = open_db_in_memory().unwrap();
    let (user_id, entry_id) = owned_game(&mut conn);
    let before = now_epoch_ms();

    let change = LibraryService::new(&mut conn)
        .update_download_status(entry_id, DownloadStatus::Downloaded, now_epoch_ms())
        .unwrap();
    assert_eq!(change.status, DownloadStatus::Downloaded);
    assert!(change.history_id.is_some());

    let entry = SqlitePurchasedGameRepository::new(&conn)
        .get_purchased_game(entry_id)
        .unwrap()
        .unwrap();
    assert_eq!(entry.download_status, DownloadStatus::Downloaded);

    let history = SqliteDownloadHistoryRepository::new(&conn)
        .list_by_user(user_id)
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].game_id, entry.game_id);
    assert!(history[0].download_date >= before);
}

#[test]
fn in_progress_statuses_do_not_touch_history() {
    let mut conn = open_db_in_memory().unwrap();
    let (user_id, entry_id) = owned_game(&mut conn);

    let mut service = LibraryService::new(&mut conn);
    let change = service
        .update_download_status(entry_id, DownloadStatus::Downloading, 2_000)
        .unwrap();
    assert!(change.history_id.is_none());
    service
        .update_download_status(entry_id, DownloadStatus::NotDownloaded, 3_000)
        .unwrap();

    assert_eq!(
        SqliteDownloadHistoryRepository::new(&conn)
            .count_by_user(user_id)
            .unwrap(),
        0
    );
}

#[test]
fn every_completion_is_recorded_including_install() {
    let mut conn = open_db_in_memory().unwrap();
    let (user_id, entry_id) = owned_game(&mut conn);

    let mut service = LibraryService::new(&mut conn);
    service
        .update_download_status(entry_id, DownloadStatus::Downloaded, 2_000)
        .unwrap();
    service
        .update_download_status(entry_id, DownloadStatus::Installed, 3_000)
        .unwrap();

    let history = SqliteDownloadHistoryRepository::new(&conn);
    assert_eq!(history.count_by_user(user_id).unwrap(), 2);
    let game_id = SqlitePurchasedGameRepository::new(&conn)
        .get_purchased_game(entry_id)
        .unwrap()
        .unwrap()
        .game_id;
    let latest = history
        .find_by_user_and_game(user_id, game_id)
        .unwrap()
        .unwrap();
    assert_eq!(latest.download_date, 3_000);
}

#[test]
fn unknown_entry_is_not_found_and_writes_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let (user_id, _) = owned_game(&mut conn);

    let err = LibraryService::new(&mut conn)
        .update_download_status(404, DownloadStatus::Downloaded, 2_000)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: "purchased game",
            id: 404
        }
    ));
    assert_eq!(
        SqliteDownloadHistoryRepository::new(&conn)
            .count_by_user(user_id)
            .unwrap(),
        0
    );
}

#[test]
fn plain_status_update_is_not_found_for_missing_rows() {
    let conn = open_db_in_memory().unwrap();
    let err = SqlitePurchasedGameRepository::new(&conn)
        .update_download_status(7, DownloadStatus::Downloading)
        .unwrap_err();
    assert!(err.is_not_found());
}
