//! End-to-end flows through the portal coordinator.

mod common;

use campus_records::{
    directory::{DirectoryFilter, RoleFilter},
    net::ApiError,
    portal::{Portal, PortalError, Workspace},
    records::{CourseDraft, Grade},
    router::{RouterState, Tab},
    session::Role,
    storage::{DARK_MODE_KEY, KeyValueStore, MemoryStore, TOKEN_KEY},
};
use common::{ADMIN_EMAIL, FakeApi, PASSWORD, STUDENT_EMAIL, sample_logs};
use std::sync::Arc;

fn portal(api: &FakeApi, storage: &Arc<MemoryStore>) -> Portal {
    Portal::new(Arc::new(api.clone()), storage.clone())
}

#[tokio::test]
async fn test_student_flow() {
    let api = FakeApi::with_directory(1, 2);
    let storage = Arc::new(MemoryStore::new());
    let mut portal = portal(&api, &storage);

    portal.login(STUDENT_EMAIL, PASSWORD).await.unwrap();
    assert_eq!(portal.router().state(), RouterState::Student(Tab::Dashboard));

    // Admin-only tab is ignored
    assert!(!portal.select_tab(Tab::Users));
    assert!(portal.select_tab(Tab::Courses));
    assert_eq!(portal.router().current(), Some(Tab::Courses));

    let records = portal.records_mut().unwrap();
    records
        .add_course(CourseDraft::new("Data Structures", "cs201", 3).with_grade(Grade::A))
        .unwrap();
    let db = records
        .add_course(CourseDraft::new("DB", "cs202", 3).with_grade(Grade::BPlus))
        .unwrap()
        .id;
    assert_eq!(portal.records().unwrap().gpa().to_string(), "3.65");

    portal.records_mut().unwrap().delete_course(db).unwrap();
    let stats = portal.records().unwrap().stats();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.credit_hours, 3);

    assert!(matches!(
        portal.directory(),
        Err(PortalError::WrongRole(Role::Student))
    ));
    assert!(matches!(
        portal.load_directory(DirectoryFilter::default()).await,
        Err(PortalError::WrongRole(Role::Student))
    ));
    assert_eq!(api.calls("list_users"), 0);
}

#[tokio::test]
async fn test_admin_flow() {
    let api = FakeApi::with_directory(3, 7);
    let storage = Arc::new(MemoryStore::new());
    let mut portal = portal(&api, &storage);

    portal.login(ADMIN_EMAIL, PASSWORD).await.unwrap();
    assert_eq!(portal.router().title(), "Admin Dashboard");
    assert!(portal.records().is_err());

    portal.load_admin_data().await.unwrap();
    assert_eq!(portal.directory().unwrap().summary().total, 10);

    let feed = portal.activity().unwrap();
    assert_eq!(feed.len(), sample_logs().len());
    assert_eq!(feed.recent().len(), 5);
    assert_eq!(feed.all()[0].id, "log6");

    let admins = portal
        .load_directory(DirectoryFilter::default().with_role(RoleFilter::Only(Role::Admin)))
        .await
        .unwrap();
    assert_eq!(admins.len(), 3);

    portal.delete_user("s0").await.unwrap();
    assert_eq!(portal.directory().unwrap().summary().students, 6);

    let csv = portal.export_users().await.unwrap();
    assert!(String::from_utf8(csv).unwrap().starts_with("ID,"));
}

#[tokio::test]
async fn test_token_rejection_forces_logout() {
    let api = FakeApi::with_directory(1, 1);
    let storage = Arc::new(MemoryStore::new());
    let mut portal = portal(&api, &storage);
    portal.login(ADMIN_EMAIL, PASSWORD).await.unwrap();
    portal.select_tab(Tab::Users);

    api.fail_next(ApiError::Unauthorized);
    let err = portal
        .load_directory(DirectoryFilter::default())
        .await
        .unwrap_err();
    assert!(err.invalidates_session());

    assert!(!portal.is_authenticated());
    assert_eq!(portal.router().state(), RouterState::Unauthenticated);
    assert!(matches!(portal.workspace(), Workspace::SignedOut));
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_transient_failure_keeps_session() {
    let api = FakeApi::with_directory(1, 1);
    let storage = Arc::new(MemoryStore::new());
    let mut portal = portal(&api, &storage);
    portal.login(ADMIN_EMAIL, PASSWORD).await.unwrap();

    api.fail_next(ApiError::Timeout);
    let err = portal.load_activity().await.unwrap_err();
    assert!(!err.invalidates_session());
    assert!(portal.is_authenticated());
    assert!(portal.activity().unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_clears_role_stores() {
    let api = FakeApi::with_directory(1, 1);
    let storage = Arc::new(MemoryStore::new());
    let mut portal = portal(&api, &storage);

    portal.login(STUDENT_EMAIL, PASSWORD).await.unwrap();
    portal
        .records_mut()
        .unwrap()
        .add_course(CourseDraft::new("Compilers", "cs401", 3))
        .unwrap();

    portal.logout().unwrap();
    assert!(matches!(portal.records(), Err(PortalError::NotAuthenticated)));
    assert!(portal.router().allowed_tabs().is_empty());

    // Courses do not survive into the next session
    portal.login(STUDENT_EMAIL, PASSWORD).await.unwrap();
    assert!(portal.records().unwrap().courses().is_empty());
}

#[tokio::test]
async fn test_restore_opens_workspace() {
    let api = FakeApi::with_directory(1, 1);
    let storage = Arc::new(MemoryStore::new());
    portal(&api, &storage)
        .login(ADMIN_EMAIL, PASSWORD)
        .await
        .unwrap();

    let mut next_run = portal(&api, &storage);
    assert!(next_run.restore().await.is_some());
    assert_eq!(next_run.router().state(), RouterState::Admin(Tab::Dashboard));
    assert!(next_run.directory().is_ok());
}

#[tokio::test]
async fn test_failed_restore_closes_workspace() {
    let api = FakeApi::with_directory(1, 1);
    let storage = Arc::new(MemoryStore::new());
    let mut portal = portal(&api, &storage);

    portal.login(STUDENT_EMAIL, PASSWORD).await.unwrap();
    portal
        .records_mut()
        .unwrap()
        .add_course(CourseDraft::new("Compilers", "cs401", 3))
        .unwrap();
    api.revoke_tokens();

    assert!(portal.restore().await.is_none());
    assert!(!portal.is_authenticated());
    assert_eq!(portal.router().role(), None);
    assert_eq!(portal.router().state(), RouterState::Unauthenticated);
    assert!(matches!(portal.records(), Err(PortalError::NotAuthenticated)));
    assert!(matches!(portal.workspace(), Workspace::SignedOut));
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_restore_without_token_closes_workspace() {
    let api = FakeApi::with_directory(1, 1);
    let storage = Arc::new(MemoryStore::new());
    let mut portal = portal(&api, &storage);

    portal.login(ADMIN_EMAIL, PASSWORD).await.unwrap();
    storage.remove(TOKEN_KEY).unwrap();

    assert!(portal.restore().await.is_none());
    assert!(!portal.is_authenticated());
    assert!(matches!(portal.directory(), Err(PortalError::NotAuthenticated)));
    assert!(portal.router().allowed_tabs().is_empty());
}

#[tokio::test]
async fn test_dark_mode_persists_across_logout() {
    let api = FakeApi::with_directory(1, 1);
    let storage = Arc::new(MemoryStore::new());
    let mut portal = portal(&api, &storage);

    assert!(portal.toggle_dark_mode().unwrap());
    portal.login(STUDENT_EMAIL, PASSWORD).await.unwrap();
    portal.logout().unwrap();

    assert!(portal.dark_mode());
    assert_eq!(storage.get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));
}
