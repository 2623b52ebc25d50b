use gamehaven_core::model::now_epoch_ms;
use gamehaven_core::{
    DownloadHistory, DownloadHistoryFacade, DownloadStatus, Game, GameFacade, LibraryFacade,
    PurchaseRequest, Store, Table, TransactionFacade, User, UserFacade, UserRole,
};
use std::future::Future;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

async fn within<T>(future: impl Future<Output = T>) -> T {
    tokio::time::timeout(WAIT, future).await.unwrap()
}

#[tokio::test]
async fn all_games_redelivers_after_insert_and_delete() {
    let store = Store::open_in_memory().unwrap();
    let games = GameFacade::new(store.clone());

    let mut live = games.all_games().await.unwrap();
    assert!(live.current().is_empty());

    let id = games.insert(Game::new("Cyber Jump", 25_000.0, 100)).await.unwrap();
    let listed = within(live.wait_for(|list| list.len() == 1)).await.unwrap();
    assert_eq!(listed[0].id, id);

    games.delete(id).await.unwrap();
    let listed = within(live.wait_for(|list| list.is_empty())).await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn search_and_category_queries_follow_edits() {
    let store = Store::open_in_memory().unwrap();
    let games = GameFacade::new(store.clone());
    let id = games
        .insert(Game {
            category: "Action".to_string(),
            ..Game::new("Cyber Jump", 25_000.0, 100)
        })
        .await
        .unwrap();

    let mut search = games.search("zombie").await.unwrap();
    let mut shooters = games.games_by_category("Shooter").await.unwrap();
    let mut categories = games.categories().await.unwrap();
    assert!(search.current().is_empty());
    assert_eq!(categories.current(), vec!["Action"]);

    let mut renamed = games.get(id).await.unwrap().unwrap();
    renamed.title = "Zombie Jump".to_string();
    renamed.category = "Shooter".to_string();
    games.update(renamed).await.unwrap();

    within(search.wait_for(|list| list.len() == 1)).await.unwrap();
    within(shooters.wait_for(|list| list.len() == 1)).await.unwrap();
    within(categories.wait_for(|list| list == &vec!["Shooter".to_string()]))
        .await
        .unwrap();
}

#[tokio::test]
async fn purchase_and_status_change_refresh_library_and_history() {
    let store = Store::open_in_memory().unwrap();
    let users = UserFacade::new(store.clone());
    let games = GameFacade::new(store.clone());
    let transactions = TransactionFacade::new(store.clone());
    let library = LibraryFacade::new(store.clone());
    let downloads = DownloadHistoryFacade::new(store.clone());

    let user_id = users
        .insert(User::new("shir", "shir@gmail.com", "123", UserRole::Regular))
        .await
        .unwrap();
    let game_id = games
        .insert(Game::new("Puzzle Quest", 15_000.0, 200))
        .await
        .unwrap();
    let game = games.get(game_id).await.unwrap().unwrap();

    let mut owned = library.library(user_id).await.unwrap();
    let mut history = downloads.by_user(user_id).await.unwrap();
    let mut sales = transactions.all_transactions().await.unwrap();

    let receipt = transactions
        .record_purchase(PurchaseRequest::single_game(
            user_id,
            &game,
            now_epoch_ms(),
        ))
        .await
        .unwrap();
    let entries = within(owned.wait_for(|list| list.len() == 1)).await.unwrap();
    within(sales.wait_for(|list| list.len() == 1)).await.unwrap();
    assert!(library.is_owned(user_id, game_id).await.unwrap());

    let details = transactions.details(receipt.transaction_id).await.unwrap();
    assert_eq!(details.current().len(), 1);

    library
        .update_download_status(entries[0].id, DownloadStatus::Downloaded)
        .await
        .unwrap();
    within(owned.wait_for(|list| list[0].download_status == DownloadStatus::Downloaded))
        .await
        .unwrap();
    let recorded = within(history.wait_for(|list| list.len() == 1)).await.unwrap();
    assert_eq!(recorded[0].game_id, game_id);
}

#[tokio::test]
async fn user_delete_refreshes_dependents_but_history_stays() {
    let store = Store::open_in_memory().unwrap();
    let users = UserFacade::new(store.clone());
    let downloads = DownloadHistoryFacade::new(store.clone());

    let user_id = users
        .insert(User::new("Farr", "farr@gmail.com", "123", UserRole::Admin))
        .await
        .unwrap();
    downloads
        .record(DownloadHistory::new(user_id, 99, 1_000))
        .await
        .unwrap();

    let mut admins = users.users_by_role(UserRole::Admin).await.unwrap();
    assert_eq!(admins.current().len(), 1);

    users.delete(user_id).await.unwrap();
    within(admins.wait_for(|list| list.is_empty())).await.unwrap();
    assert_eq!(downloads.count_for_user(user_id).await.unwrap(), 1);
    assert!(downloads.find(user_id, 99).await.unwrap().is_some());
}

#[tokio::test]
async fn unrelated_tables_do_not_trigger_refresh() {
    let store = Store::open_in_memory().unwrap();
    let users = UserFacade::new(store.clone());
    let games = GameFacade::new(store.clone());

    let mut live_users = users.all_users().await.unwrap();
    games.insert(Game::new("Cyber Jump", 1.0, 1)).await.unwrap();
    users
        .insert(User::new("shir", "shir@gmail.com", "123", UserRole::Regular))
        .await
        .unwrap();

    // The first delivery after subscribing reflects the user insert, not the game one.
    let delivered = within(live_users.next()).await.unwrap();
    assert_eq!(delivered.len(), 1);
}

#[tokio::test]
async fn change_bus_publishes_every_touched_table() {
    let store = Store::open_in_memory().unwrap();
    let mut changes = store.subscribe_changes();
    let users = UserFacade::new(store.clone());

    let user_id = users
        .insert(User::new("shir", "shir@gmail.com", "123", UserRole::Regular))
        .await
        .unwrap();
    assert_eq!(changes.recv().await.unwrap(), Table::Users);

    users.delete(user_id).await.unwrap();
    let mut touched = Vec::new();
    for _ in 0..4 {
        touched.push(changes.recv().await.unwrap());
    }
    assert!(touched.contains(&Table::PurchasedGames));
    assert!(touched.contains(&Table::Transactions));
}

#[tokio::test]
async fn failed_write_publishes_nothing() {
    let store = Store::open_in_memory().unwrap();
    let mut changes = store.subscribe_changes();
    let games = GameFacade::new(store.clone());

    let mut ghost = Game::new("Ghost", 1.0, 1);
    ghost.id = 404;
    assert!(games.update(ghost).await.unwrap_err().is_not_found());
    assert!(changes.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropped_write_future_still_refreshes_live_queries() {
    let store = Store::open_in_memory().unwrap();
    let games = GameFacade::new(store.clone());
    let mut live = games.all_games().await.unwrap();

    // Keep the connection busy so the insert below is still queued when its caller gives up.
    let (locked_tx, locked_rx) = tokio::sync::oneshot::channel();
    let holder = store.clone();
    let hold = tokio::task::spawn_blocking(move || {
        holder.with_connection(|_| {
            let _ = locked_tx.send(());
            std::thread::sleep(Duration::from_millis(300));
            Ok(())
        })
    });
    locked_rx.await.unwrap();

    let insert = games.insert(Game::new("Zombie Arena", 40_000.0, 50));
    assert!(tokio::time::timeout(Duration::from_millis(10), insert)
        .await
        .is_err());
    hold.await.unwrap().unwrap();

    let listed = within(live.wait_for(|list| !list.is_empty())).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(games.count_games().await.unwrap(), 1);
}
