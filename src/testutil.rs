//! Test utilities: a scripted transport and an in-memory fake backend.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::client::{FetchError, RawResponse, Transport};
use crate::resource::{Method, ResourceRequest, TENANT_HEADER};

/// `{ <field>: payload }` with status 200.
pub fn envelope(field: &str, payload: Value) -> RawResponse {
    RawResponse::json(200, &json!({ field: payload }))
}

/// `{ <field>: items, pagination }` with status 200.
pub fn list_envelope(field: &str, items: Value, total: u64, limit: u32) -> RawResponse {
    let total_pages = total.div_ceil(u64::from(limit.max(1)));
    RawResponse::json(
        200,
        &json!({
            field: items,
            "pagination": {"total": total, "totalPages": total_pages, "limit": limit}
        }),
    )
}

/// Releases a gated reply.
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    pub fn open(self) {
        let _ = self.0.send(());
    }
}

/// One scripted answer.
pub struct Reply {
    outcome: Result<RawResponse, FetchError>,
    delay: Option<Duration>,
    gate: Option<oneshot::Receiver<()>>,
}

impl Reply {
    pub fn ok(response: RawResponse) -> Self {
        Self {
            outcome: Ok(response),
            delay: None,
            gate: None,
        }
    }

    pub fn err(error: FetchError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
            gate: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Holds the reply until the returned gate is opened or dropped.
    pub fn gated(mut self) -> (Self, Gate) {
        let (tx, rx) = oneshot::channel();
        self.gate = Some(rx);
        (self, Gate(tx))
    }
}

#[derive(Clone)]
struct Sticky {
    outcome: Result<RawResponse, FetchError>,
    delay: Option<Duration>,
}

#[derive(Default)]
struct Script {
    queued: HashMap<String, VecDeque<Reply>>,
    sticky: HashMap<String, Sticky>,
    calls: Vec<ResourceRequest>,
}

/// Transport answering from a script keyed by `"METHOD endpoint"`.
///
/// Queued replies are used first, in order; after that the route's standing
/// reply, if any. Unscripted routes fail as network errors.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<Script>,
}

fn route(method: Method, endpoint: &str) -> String {
    format!("{} {}", method, endpoint)
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Standing reply for every call to the route.
    pub fn respond(&self, method: Method, endpoint: &str, response: RawResponse) {
        self.standing(method, endpoint, Ok(response), None);
    }

    pub fn respond_after(&self, method: Method, endpoint: &str, response: RawResponse, delay: Duration) {
        self.standing(method, endpoint, Ok(response), Some(delay));
    }

    pub fn fail(&self, method: Method, endpoint: &str, error: FetchError) {
        self.standing(method, endpoint, Err(error), None);
    }

    fn standing(
        &self,
        method: Method,
        endpoint: &str,
        outcome: Result<RawResponse, FetchError>,
        delay: Option<Duration>,
    ) {
        self.script()
            .sticky
            .insert(route(method, endpoint), Sticky { outcome, delay });
    }

    /// One-shot reply, used before any standing reply.
    pub fn enqueue(&self, method: Method, endpoint: &str, reply: Reply) {
        self.script()
            .queued
            .entry(route(method, endpoint))
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<ResourceRequest> {
        self.script().calls.clone()
    }

    pub fn call_count(&self, method: Method, endpoint: &str) -> usize {
        self.script()
            .calls
            .iter()
            .filter(|c| c.method == method && c.endpoint == endpoint)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: &ResourceRequest) -> Result<RawResponse, FetchError> {
        let key = route(request.method, &request.endpoint);
        let reply = {
            let mut script = self.script();
            script.calls.push(request.clone());
            let queued = script.queued.get_mut(&key).and_then(VecDeque::pop_front);
            match queued {
                Some(reply) => reply,
                None => match script.sticky.get(&key) {
                    Some(sticky) => Reply {
                        outcome: sticky.outcome.clone(),
                        delay: sticky.delay,
                        gate: None,
                    },
                    None => Reply::err(FetchError::network(format!("no reply scripted for {key}"))),
                },
            }
        };

        if let Some(gate) = reply.gate {
            let _ = gate.await;
        }
        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }
        reply.outcome
    }
}

/// In-memory stand-in for the dashboard backend, served over real HTTP.
#[derive(Clone)]
pub struct FakeBackend {
    data: Arc<Mutex<FakeData>>,
}

struct FakeData {
    users: Vec<Value>,
    next_id: u32,
}

impl FakeBackend {
    /// Seeds `user_count` customers named `user01@example.sa` and up.
    pub fn new(user_count: u32) -> Self {
        let users = (1..=user_count).map(seed_user).collect();
        Self {
            data: Arc::new(Mutex::new(FakeData {
                users,
                next_id: user_count + 1,
            })),
        }
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    /// Status of the user with `id`, if present.
    pub fn user_status(&self, id: &str) -> Option<String> {
        self.lock()
            .users
            .iter()
            .find(|u| u["id"] == id)
            .and_then(|u| u["status"].as_str().map(str::to_string))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/admin/statistics", get(admin_statistics))
            .route("/api/provider/statistics", get(provider_statistics))
            .route("/api/bookings/{id}/status", get(booking_status))
            .route("/api/admin/users", get(list_users).post(create_user))
            .route("/api/admin/users/bulk", post(bulk_users))
            .route("/api/admin/users/{id}", put(update_user).delete(delete_user))
            .route("/api/admin/export", get(admin_export))
            .route("/api/provider/export", get(provider_export))
            .layer(TraceLayer::new_for_http())
            .with_state(self.clone())
    }

    /// Serves on an ephemeral loopback port and returns the base URL.
    pub async fn serve(&self) -> std::io::Result<(String, JoinHandle<()>)> {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let router = self.router();
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok((format!("http://{addr}"), task))
    }
}

fn seed_user(n: u32) -> Value {
    json!({
        "id": format!("u{n}"),
        "email": format!("user{n:02}@example.sa"),
        "first_name": "User",
        "last_name": format!("{n:02}"),
        "role": "customer",
        "status": "active"
    })
}

fn rejected(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn require_tenant(headers: &HeaderMap) -> Result<(), Response> {
    match headers.get(TENANT_HEADER).and_then(|v| v.to_str().ok()) {
        Some(t) if !t.is_empty() => Ok(()),
        _ => Err(rejected(StatusCode::BAD_REQUEST, "Tenant not found")),
    }
}

async fn admin_statistics(State(backend): State<FakeBackend>, headers: HeaderMap) -> Response {
    if let Err(r) = require_tenant(&headers) {
        return r;
    }
    let users = backend.user_count();
    Json(json!({
        "statistics": {
            "users": users,
            "providers": 3,
            "services": 12,
            "bookings": 40,
            "revenue": {"total": 12500.0, "commission": 1250.0},
            "bookingsByStatus": {"pending": 5, "completed": 35},
            "recentBookings": []
        }
    }))
    .into_response()
}

async fn provider_statistics(headers: HeaderMap) -> Response {
    if let Err(r) = require_tenant(&headers) {
        return r;
    }
    Json(json!({
        "statistics": {
            "services": 4,
            "bookings": 18,
            "earnings": 5400.0,
            "rating": {"average": 4.6, "total": 11},
            "bookingsByStatus": {"confirmed": 3}
        }
    }))
    .into_response()
}

async fn booking_status(Path(id): Path<String>) -> Response {
    if id != "b-1" {
        return rejected(StatusCode::NOT_FOUND, "Booking not found");
    }
    Json(json!({
        "success": true,
        "booking": {
            "id": "b-1",
            "status": "confirmed",
            "payment_status": "paid",
            "scheduled_at": "2026-10-14T09:00:00Z",
            "total_amount": 250.0,
            "currency": "SAR",
            "customer_address": "{\"city\":\"Riyadh\"}",
            "service": {"name": "Cleaning", "name_ar": "تنظيف"},
            "provider": {"name": "Sparkle", "name_ar": "سباركل", "rating": 4.8}
        }
    }))
    .into_response()
}

#[derive(Deserialize)]
struct ListQuery {
    page: Option<usize>,
    limit: Option<usize>,
    search: Option<String>,
}

async fn list_users(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    if let Err(r) = require_tenant(&headers) {
        return r;
    }
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).max(1);
    let data = backend.lock();
    let matching: Vec<&Value> = data
        .users
        .iter()
        .filter(|u| match &query.search {
            Some(term) => u["email"].as_str().is_some_and(|e| e.contains(term.as_str())),
            None => true,
        })
        .collect();
    let total = matching.len();
    let rows: Vec<&Value> = matching.into_iter().skip((page - 1) * limit).take(limit).collect();
    Json(json!({
        "users": rows,
        "pagination": {"total": total, "totalPages": total.div_ceil(limit), "limit": limit}
    }))
    .into_response()
}

async fn create_user(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(form): Json<Value>,
) -> Response {
    if let Err(r) = require_tenant(&headers) {
        return r;
    }
    let mut data = backend.lock();
    if data.users.iter().any(|u| u["email"] == form["email"]) {
        return rejected(StatusCode::CONFLICT, "Email already exists");
    }
    let id = format!("u{}", data.next_id);
    data.next_id += 1;
    let user = json!({
        "id": id,
        "email": form["email"],
        "first_name": form.get("firstName"),
        "last_name": form.get("lastName"),
        "role": form["role"],
        "status": form.get("status").cloned().unwrap_or(json!("active"))
    });
    data.users.push(user.clone());
    (StatusCode::CREATED, Json(json!({ "user": user }))).into_response()
}

async fn update_user(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    Json(form): Json<Value>,
) -> Response {
    let mut data = backend.lock();
    let Some(user) = data.users.iter_mut().find(|u| u["id"] == id.as_str()) else {
        return rejected(StatusCode::NOT_FOUND, "User not found");
    };
    let fields = [
        ("email", "email"),
        ("first_name", "firstName"),
        ("last_name", "lastName"),
        ("role", "role"),
        ("status", "status"),
    ];
    for (field, wire) in fields {
        if let Some(value) = form.get(wire) {
            user[field] = value.clone();
        }
    }
    Json(json!({ "user": user.clone() })).into_response()
}

async fn delete_user(State(backend): State<FakeBackend>, Path(id): Path<String>) -> Response {
    let mut data = backend.lock();
    let before = data.users.len();
    data.users.retain(|u| u["id"] != id.as_str());
    if data.users.len() == before {
        return rejected(StatusCode::NOT_FOUND, "User not found");
    }
    Json(json!({ "success": true })).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkBody {
    action: String,
    user_ids: Vec<String>,
}

async fn bulk_users(State(backend): State<FakeBackend>, Json(body): Json<BulkBody>) -> Response {
    let mut data = backend.lock();
    let selected = |u: &Value| body.user_ids.iter().any(|id| u["id"] == id.as_str());
    match body.action.as_str() {
        "delete" => data.users.retain(|u| !selected(u)),
        "activate" | "deactivate" => {
            let status = if body.action == "activate" { "active" } else { "suspended" };
            for user in data.users.iter_mut().filter(|u| selected(&**u)) {
                user["status"] = json!(status);
            }
        }
        _ => return rejected(StatusCode::BAD_REQUEST, "Unknown action"),
    }
    Json(json!({ "success": true })).into_response()
}

#[derive(Deserialize)]
struct ExportQuery {
    format: String,
}

fn export_body(format: &str, allowed: &[&str]) -> Response {
    if !allowed.contains(&format) {
        return rejected(StatusCode::BAD_REQUEST, "Unsupported format");
    }
    let content_type = match format {
        "csv" => "text/csv",
        "pdf" => "application/pdf",
        _ => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    };
    (
        [(header::CONTENT_TYPE, content_type)],
        format!("export,{format}\n1,2\n"),
    )
        .into_response()
}

async fn admin_export(headers: HeaderMap, Query(query): Query<ExportQuery>) -> Response {
    if let Err(r) = require_tenant(&headers) {
        return r;
    }
    export_body(&query.format, &["csv", "pdf", "excel"])
}

async fn provider_export(headers: HeaderMap, Query(query): Query<ExportQuery>) -> Response {
    if let Err(r) = require_tenant(&headers) {
        return r;
    }
    export_body(&query.format, &["csv", "excel"])
}
