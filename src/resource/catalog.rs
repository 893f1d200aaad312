use serde::de::DeserializeOwned;

use crate::core::DashError;
use crate::resource::{
    AdminStatistics, BookingDetails, PageCursor, ProviderStatistics, ResourceRequest,
    TenantContext, User,
};

/// A payload type and the envelope field it is delivered under.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// `statistics` in `{"statistics": {...}}`.
    const FIELD: &'static str;
}

impl Resource for AdminStatistics {
    const FIELD: &'static str = "statistics";
}

impl Resource for ProviderStatistics {
    const FIELD: &'static str = "statistics";
}

impl Resource for BookingDetails {
    const FIELD: &'static str = "booking";
}

impl Resource for Vec<User> {
    const FIELD: &'static str = "users";
}

pub fn admin_statistics(tenant: &TenantContext) -> ResourceRequest {
    ResourceRequest::get("/api/admin/statistics")
        .with_key("statistics:admin")
        .with_tenant(tenant)
}

pub fn provider_statistics(tenant: &TenantContext) -> ResourceRequest {
    ResourceRequest::get("/api/provider/statistics")
        .with_key("statistics:provider")
        .with_tenant(tenant)
}

/// Public tracking page: no tenant header. The id becomes a path segment,
/// so only unreserved URL characters are accepted.
pub fn booking_status(booking_id: &str) -> Result<ResourceRequest, DashError> {
    let unreserved = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~');
    // Empty, `.` and `..` would collapse into a different path.
    let dots = booking_id.chars().all(|c| c == '.');
    if dots || !booking_id.chars().all(unreserved) {
        return Err(DashError::InvalidRequest(format!(
            "invalid booking id: {:?}",
            booking_id
        )));
    }
    Ok(ResourceRequest::get(format!("/api/bookings/{}/status", booking_id))
        .with_key(format!("booking-status:{}", booking_id)))
}

pub fn admin_users(
    tenant: &TenantContext,
    cursor: PageCursor,
    search: Option<&str>,
) -> ResourceRequest {
    let mut request = ResourceRequest::get("/api/admin/users")
        .with_key("users:admin")
        .with_tenant(tenant);
    request.set_cursor(cursor);
    request.set_search(search);
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_keys() {
        let tenant = TenantContext::new("demo");
        assert_eq!(admin_statistics(&tenant).key(), "statistics:admin");
        assert_eq!(provider_statistics(&tenant).key(), "statistics:provider");
        assert_eq!(provider_statistics(&tenant).tenant(), Some("demo"));
    }

    #[test]
    fn test_booking_status_is_public() {
        let req = booking_status("b-42").unwrap();
        assert_eq!(req.endpoint, "/api/bookings/b-42/status");
        assert_eq!(req.key(), "booking-status:b-42");
        assert_eq!(req.tenant(), None);
    }

    #[test]
    fn test_booking_id_must_be_one_path_segment() {
        for id in ["", "..", "b/1", "b?x=1", "b#top", "b%2F1", "b 1"] {
            assert!(
                matches!(booking_status(id), Err(DashError::InvalidRequest(_))),
                "accepted {id:?}"
            );
        }
        assert!(booking_status("BK_2026.10~a").is_ok());
    }

    #[test]
    fn test_users_query_omits_empty_search() {
        let tenant = TenantContext::new("demo");
        let cursor = PageCursor::first(10).unwrap();
        let req = admin_users(&tenant, cursor, Some(""));
        assert_eq!(req.query_string(), "page=1&limit=10");

        let req = admin_users(&tenant, cursor, Some("sara"));
        assert_eq!(req.query_string(), "page=1&limit=10&search=sara");
        assert_eq!(req.scoped_key(), "users:admin?page=1&limit=10&search=sara");
    }
}
