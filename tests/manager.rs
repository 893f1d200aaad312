use std::time::Duration;

use serde_json::json;
use tokio::time::sleep;

use dashpoll::manager::SectionManager;
use dashpoll::poller::{PollController, PollSchedule};
use dashpoll::resource::{
    AdminStatistics, Method, PageCursor, ProviderStatistics, TenantContext, User, catalog,
};
use dashpoll::testutil::{MockTransport, envelope, list_envelope};

fn scripted() -> std::sync::Arc<MockTransport> {
    let mock = MockTransport::new();
    mock.respond(
        Method::Get,
        "/api/admin/statistics",
        envelope(
            "statistics",
            json!({
                "users": 1, "providers": 1, "services": 1, "bookings": 1,
                "revenue": {"total": 1.0, "commission": 0.1}
            }),
        ),
    );
    mock.respond(
        Method::Get,
        "/api/provider/statistics",
        envelope(
            "statistics",
            json!({
                "services": 1, "bookings": 1, "earnings": 1.0,
                "rating": {"average": 5.0, "total": 1}
            }),
        ),
    );
    mock.respond(
        Method::Get,
        "/api/admin/users",
        list_envelope("users", json!([]), 0, 10),
    );
    mock
}

#[tokio::test(start_paused = true)]
async fn test_mount_and_unmount_all() {
    let mock = scripted();
    let tenant = TenantContext::new("demo");
    let manager = SectionManager::new(PollController::new(mock.clone()));
    let schedule = Some(PollSchedule::DASHBOARD);

    let stats = manager
        .mount::<AdminStatistics>(catalog::admin_statistics(&tenant), schedule)
        .await
        .unwrap();
    let provider = manager
        .mount::<ProviderStatistics>(catalog::provider_statistics(&tenant), schedule)
        .await
        .unwrap();
    assert_eq!(
        manager.keys().await,
        vec!["statistics:admin", "statistics:provider"]
    );
    sleep(Duration::from_secs(31)).await;
    assert_eq!(mock.calls().len(), 4);

    manager.unmount_all().await;
    assert!(stats.is_stopped());
    assert!(provider.is_stopped());
    assert!(manager.keys().await.is_empty());

    sleep(Duration::from_secs(300)).await;
    assert_eq!(mock.calls().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_mounting_same_key_replaces_previous() {
    let mock = scripted();
    let tenant = TenantContext::new("demo");
    let manager = SectionManager::new(PollController::new(mock.clone()));

    let first = manager
        .mount::<Vec<User>>(
            catalog::admin_users(&tenant, PageCursor::first(10).unwrap(), None),
            None,
        )
        .await
        .unwrap();
    let second = manager
        .mount::<Vec<User>>(
            catalog::admin_users(&tenant, PageCursor::first(10).unwrap(), Some("sara")),
            None,
        )
        .await
        .unwrap();

    assert!(first.is_stopped());
    assert!(!second.is_stopped());
    assert_eq!(manager.keys().await, vec!["users:admin"]);
    assert!(manager.is_mounted("users:admin").await);
}

#[tokio::test(start_paused = true)]
async fn test_unmount_single_key() {
    let mock = scripted();
    let manager = SectionManager::new(PollController::new(mock.clone()));
    let handle = manager
        .mount::<AdminStatistics>(catalog::admin_statistics(&TenantContext::new("demo")), None)
        .await
        .unwrap();

    assert!(manager.unmount("statistics:admin").await);
    assert!(!manager.unmount("statistics:admin").await);
    assert!(handle.is_stopped());
    assert!(!manager.is_mounted("statistics:admin").await);
}
