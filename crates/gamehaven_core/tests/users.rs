use gamehaven_core::db::open_db_in_memory;
use gamehaven_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use gamehaven_core::{RepoError, User, UserRole};

#[test]
fn login_returns_the_matching_account() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&conn);
    let admin_id = repo
        .insert_user(&User::new("Farr", "farr@gmail.com", "123", UserRole::Admin))
        .unwrap();
    repo.insert_user(&User::new("shir", "shir@gmail.com", "123", UserRole::Regular))
        .unwrap();

    let user = repo.login("farr@gmail.com", "123").unwrap().unwrap();
    assert_eq!(user.id, admin_id);
    assert_eq!(user.username, "Farr");
    assert!(user.is_admin());
}

#[test]
fn login_is_exact_and_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&conn);
    repo.insert_user(&User::new("Farr", "farr@gmail.com", "Secret", UserRole::Admin))
        .unwrap();

    assert!(repo.login("farr@gmail.com", "secret").unwrap().is_none());
    assert!(repo.login("FARR@gmail.com", "Secret").unwrap().is_none());
    assert!(repo.login("farr@gmail.com ", "Secret").unwrap().is_none());
    assert!(repo.login("nobody@gmail.com", "Secret").unwrap().is_none());
    assert!(repo.login("farr@gmail.com", "Secret").unwrap().is_some());
}

#[test]
fn role_counts_add_up() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&conn);
    repo.insert_user(&User::new("a", "a@x.com", "p", UserRole::Admin))
        .unwrap();
    repo.insert_user(&User::new("b", "b@x.com", "p", UserRole::Regular))
        .unwrap();
    repo.insert_user(&User::new("c", "c@x.com", "p", UserRole::Regular))
        .unwrap();

    assert_eq!(repo.count_users().unwrap(), 3);
    assert_eq!(repo.count_users_by_role(UserRole::Admin).unwrap(), 1);
    assert_eq!(repo.count_users_by_role(UserRole::Regular).unwrap(), 2);

    let regulars = repo.list_users_by_role(UserRole::Regular).unwrap();
    let names: Vec<&str> = regulars.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["c", "b"]);
}

#[test]
fn list_users_is_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&conn);
    let first = repo
        .insert_user(&User::new("first", "1@x.com", "p", UserRole::Regular))
        .unwrap();
    let second = repo
        .insert_user(&User::new("second", "2@x.com", "p", UserRole::Regular))
        .unwrap();

    let ids: Vec<i64> = repo.list_users().unwrap().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![second, first]);
}

#[test]
fn search_matches_username_or_email_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&conn);
    repo.insert_user(&User::new("Farr", "farr@gmail.com", "p", UserRole::Admin))
        .unwrap();
    repo.insert_user(&User::new("shir", "shir@studio.io", "p", UserRole::Regular))
        .unwrap();

    let by_name = repo.search_users("FAR").unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].username, "Farr");

    let by_email = repo.search_users("studio").unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].username, "shir");

    assert!(repo.search_users("%").unwrap().is_empty());
    assert_eq!(repo.search_users("").unwrap().len(), 2);
}

#[test]
fn insert_with_existing_id_overwrites_in_place() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&conn);
    let id = repo
        .insert_user(&User::new("shir", "shir@gmail.com", "123", UserRole::Regular))
        .unwrap();

    let mut changed = repo.get_user(id).unwrap().unwrap();
    changed.username = "Shir".to_string();
    changed.photo = Some("/photos/shir.png".to_string());
    assert_eq!(repo.insert_user(&changed).unwrap(), id);

    assert_eq!(repo.count_users().unwrap(), 1);
    assert_eq!(repo.get_user(id).unwrap(), Some(changed));
}

#[test]
fn update_and_delete_report_missing_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&conn);
    let mut ghost = User::new("ghost", "ghost@x.com", "p", UserRole::Regular);
    ghost.id = 404;

    assert!(matches!(
        repo.update_user(&ghost).unwrap_err(),
        RepoError::NotFound { entity: "user", id: 404 }
    ));
    assert!(repo.delete_user(404).unwrap_err().is_not_found());
}

#[test]
fn update_changes_role_and_find_by_email_sees_it() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&conn);
    let id = repo
        .insert_user(&User::new("shir", "shir@gmail.com", "123", UserRole::Regular))
        .unwrap();

    let mut promoted = repo.get_user(id).unwrap().unwrap();
    promoted.role = UserRole::Admin;
    repo.update_user(&promoted).unwrap();

    let found = repo.find_by_email("shir@gmail.com").unwrap().unwrap();
    assert_eq!(found.role, UserRole::Admin);
    assert!(repo.find_by_email("SHIR@gmail.com").unwrap().is_none());
}
