use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use dashpoll::actions::{AssumeYes, BulkAction, UserAdmin};
use dashpoll::client::{FetchErrorKind, HttpTransport, Transport};
use dashpoll::conf::BackendConfig;
use dashpoll::export::{DirectorySink, ExportFormat, ExportScope, Exporter};
use dashpoll::poller::{PollController, ResourceHandle};
use dashpoll::resource::{
    AdminStatistics, BookingDetails, PageCursor, Resource, ResourceRequest, Snapshot, TenantContext,
    User, catalog,
};
use dashpoll::testutil::FakeBackend;

async fn serve(backend: &FakeBackend) -> Arc<dyn Transport> {
    let (base_url, _task) = backend.serve().await.unwrap();
    let config = BackendConfig {
        base_url,
        timeout: Duration::from_secs(5),
        ..BackendConfig::default()
    };
    Arc::new(HttpTransport::new(&config).unwrap())
}

/// Waits for the first snapshot that is no longer loading.
async fn settled<P: Resource>(handle: &ResourceHandle<P>) -> Snapshot<P> {
    let mut rx = handle.subscribe();
    let ready = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| !s.is_loading()))
        .await
        .unwrap()
        .unwrap();
    ready.clone()
}

#[tokio::test]
async fn test_statistics_over_http() {
    let backend = FakeBackend::new(12);
    let controller = PollController::with_transport(serve(&backend).await);

    let handle = controller
        .start::<AdminStatistics>(catalog::admin_statistics(&TenantContext::new("demo")), None)
        .unwrap();
    let snapshot = settled(&handle).await;
    let stats = snapshot.data.unwrap();
    assert_eq!(stats.users, 12);
    assert_eq!(stats.bookings_by_status["completed"], 35);
}

#[tokio::test]
async fn test_missing_tenant_is_a_client_error() {
    let backend = FakeBackend::new(1);
    let controller = PollController::with_transport(serve(&backend).await);

    let handle = controller
        .start::<AdminStatistics>(ResourceRequest::get("/api/admin/statistics"), None)
        .unwrap();
    let snapshot = settled(&handle).await;
    let err = snapshot.error.unwrap();
    assert_eq!(err.kind, FetchErrorKind::Http4xx);
    assert_eq!(err.status, Some(400));
    assert_eq!(err.message, "Tenant not found");
}

#[tokio::test]
async fn test_booking_tracking() {
    let backend = FakeBackend::new(0);
    let controller = PollController::with_transport(serve(&backend).await);

    let found = controller
        .start::<BookingDetails>(catalog::booking_status("b-1").unwrap(), None)
        .unwrap();
    let booking = settled(&found).await.data.unwrap();
    assert_eq!(booking.status, "confirmed");
    assert_eq!(booking.address(), json!({"city": "Riyadh"}));

    let missing = controller
        .start::<BookingDetails>(catalog::booking_status("nope").unwrap(), None)
        .unwrap();
    let snapshot = settled(&missing).await;
    assert_eq!(snapshot.failure(), Some(FetchErrorKind::Http4xx));
    assert_eq!(snapshot.error.unwrap().message, "Booking not found");
}

#[tokio::test]
async fn test_paging_through_users() {
    let backend = FakeBackend::new(25);
    let controller = PollController::with_transport(serve(&backend).await);
    let request = catalog::admin_users(
        &TenantContext::new("demo"),
        PageCursor::first(10).unwrap(),
        None,
    );

    let handle = controller.start::<Vec<User>>(request, None).unwrap();
    let page = settled(&handle).await;
    let window = page.window().unwrap();
    assert_eq!((window.from, window.to, window.total), (1, 10, 25));
    assert_eq!(page.data.unwrap()[0].email, "user01@example.sa");

    handle.set_page(2).unwrap();
    let page = settled(&handle).await;
    let window = page.window().unwrap();
    assert_eq!((window.from, window.to), (11, 20));
    assert_eq!(page.data.unwrap()[0].email, "user11@example.sa");

    handle.set_page(3).unwrap();
    let page = settled(&handle).await;
    let window = page.window().unwrap();
    assert_eq!((window.from, window.to), (21, 25));
    assert!(!window.has_next);
    assert_eq!(page.data.unwrap().len(), 5);

    handle.set_search(Some("user2")).unwrap();
    let page = settled(&handle).await;
    assert_eq!(handle.request().query_value("page"), Some("1"));
    assert_eq!(page.pagination.unwrap().total, 6);
}

#[tokio::test]
async fn test_bulk_and_export_over_http() {
    let backend = FakeBackend::new(3);
    let transport = serve(&backend).await;
    let tenant = TenantContext::new("demo");

    let users = UserAdmin::new(transport.clone(), tenant.clone(), Arc::new(AssumeYes));
    users
        .bulk(BulkAction::Deactivate, &["u2".to_string()])
        .await
        .unwrap();
    assert_eq!(backend.user_status("u2").as_deref(), Some("suspended"));
    users.delete("u3").await.unwrap();
    assert_eq!(backend.user_count(), 2);

    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(transport, tenant, Arc::new(DirectorySink::new(dir.path())));
    let location = exporter
        .export(ExportScope::Admin, ExportFormat::Csv)
        .await
        .unwrap();
    let written = std::fs::read_to_string(location).unwrap();
    assert!(written.starts_with("export,csv"));
}

#[tokio::test]
async fn test_fake_backend_routes() {
    let backend = FakeBackend::new(2);
    let router = backend.router();

    let req = Request::get("/api/admin/users?page=1&limit=1")
        .header("x-tenant-subdomain", "demo")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["users"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["totalPages"], 2);
}
