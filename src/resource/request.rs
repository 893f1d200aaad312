use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resource::PageCursor;

pub const TENANT_HEADER: &str = "x-tenant-subdomain";

/// Tenant the dashboard is acting for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    pub subdomain: String,
}

impl TenantContext {
    pub fn new(subdomain: impl Into<String>) -> Self {
        Self {
            subdomain: subdomain.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One fully described call against the backend.
///
/// Requests are values: a fetch attempt owns its own clone, so later edits on
/// the handle never leak into an attempt that is already in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
    key: Option<String>,
    pub method: Method,
    pub endpoint: String,
    pub headers: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ResourceRequest {
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            key: None,
            method,
            endpoint: endpoint.into(),
            headers: BTreeMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Pins the key instead of deriving it from endpoint and query.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_tenant(mut self, tenant: &TenantContext) -> Self {
        self.headers
            .insert(TENANT_HEADER.to_string(), tenant.subdomain.clone());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_query(name, Some(value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Replaces (or with `None` removes) a query parameter, keeping its position.
    pub fn set_query(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        let position = self.query.iter().position(|(k, _)| *k == name);
        match (position, value) {
            (Some(idx), Some(value)) => self.query[idx].1 = value,
            (Some(idx), None) => {
                self.query.remove(idx);
            }
            (None, Some(value)) => self.query.push((name, value)),
            (None, None) => {}
        }
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn tenant(&self) -> Option<&str> {
        self.headers.get(TENANT_HEADER).map(String::as_str)
    }

    /// Reads `page`/`limit` back out of the query, if this is a list request.
    pub fn cursor(&self) -> Option<PageCursor> {
        let page = self.query_value("page")?.parse().ok()?;
        let limit = self.query_value("limit")?.parse().ok()?;
        PageCursor::new(page, limit).ok()
    }

    pub fn set_cursor(&mut self, cursor: PageCursor) {
        self.set_query("page", Some(cursor.page.to_string()));
        self.set_query("limit", Some(cursor.limit.to_string()));
    }

    /// Empty or whitespace-only search terms are dropped from the query.
    pub fn set_search(&mut self, search: Option<&str>) {
        let term = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self.set_query("search", term);
    }

    /// Opaque identity of the resource, e.g. `statistics:admin`.
    pub fn key(&self) -> String {
        if let Some(key) = &self.key {
            return key.clone();
        }
        let mut key = format!("{} {}", self.method, self.endpoint);
        if !self.query.is_empty() {
            key.push('?');
            key.push_str(&self.query_string());
        }
        key
    }

    /// Key with the query folded in, so page/search changes produce a new key
    /// even when the base key is pinned.
    pub fn scoped_key(&self) -> String {
        match &self.key {
            Some(key) if !self.query.is_empty() => format!("{}?{}", key, self.query_string()),
            _ => self.key(),
        }
    }

    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_header_is_attached() {
        let req = ResourceRequest::get("/api/admin/statistics").with_tenant(&TenantContext::new("demo"));
        assert_eq!(req.tenant(), Some("demo"));
        assert_eq!(req.headers.get("x-tenant-subdomain").unwrap(), "demo");
    }

    #[test]
    fn test_derived_key_includes_query() {
        let req = ResourceRequest::get("/api/admin/users")
            .with_query("page", "2")
            .with_query("limit", "10");
        assert_eq!(req.key(), "GET /api/admin/users?page=2&limit=10");
    }

    #[test]
    fn test_pinned_key_is_scoped_by_query() {
        let mut req = ResourceRequest::get("/api/admin/users").with_key("users:admin");
        req.set_cursor(PageCursor::new(1, 10).unwrap());
        assert_eq!(req.key(), "users:admin");
        assert_eq!(req.scoped_key(), "users:admin?page=1&limit=10");
    }

    #[test]
    fn test_set_query_replaces_in_place() {
        let mut req = ResourceRequest::get("/x")
            .with_query("page", "1")
            .with_query("limit", "10");
        req.set_query("page", Some("3".into()));
        assert_eq!(req.query_string(), "page=3&limit=10");
        req.set_query("page", None);
        assert_eq!(req.query_string(), "limit=10");
    }

    #[test]
    fn test_blank_search_is_dropped() {
        let mut req = ResourceRequest::get("/x").with_query("search", "old");
        req.set_search(Some("   "));
        assert_eq!(req.query_value("search"), None);
        req.set_search(Some(" sara "));
        assert_eq!(req.query_value("search"), Some("sara"));
    }

    #[test]
    fn test_cursor_round_trips_through_query() {
        let mut req = ResourceRequest::get("/x");
        assert_eq!(req.cursor(), None);
        req.set_cursor(PageCursor::new(4, 20).unwrap());
        assert_eq!(req.cursor(), Some(PageCursor::new(4, 20).unwrap()));
    }
}
