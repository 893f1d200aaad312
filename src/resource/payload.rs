use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `statistics` from `/api/admin/statistics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatistics {
    pub users: u64,
    pub providers: u64,
    pub services: u64,
    pub bookings: u64,
    pub revenue: Revenue,
    #[serde(default)]
    pub bookings_by_status: HashMap<String, u64>,
    #[serde(default)]
    pub recent_bookings: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    pub total: f64,
    pub commission: f64,
}

/// Body of `statistics` from `/api/provider/statistics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatistics {
    pub services: u64,
    pub bookings: u64,
    pub earnings: f64,
    pub rating: Rating,
    #[serde(default)]
    pub bookings_by_status: HashMap<String, u64>,
    #[serde(default)]
    pub recent_bookings: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub average: f64,
    pub total: u64,
}

/// Body of `booking` from `/api/bookings/<id>/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub id: String,
    pub status: String,
    pub payment_status: String,
    pub scheduled_at: String,
    pub total_amount: f64,
    pub currency: String,
    /// Either an address object or a JSON-encoded string of one.
    #[serde(default)]
    pub customer_address: Value,
    #[serde(default)]
    pub notes: Option<String>,
    pub service: BookedService,
    pub provider: BookedProvider,
}

impl BookingDetails {
    /// Normalises `customer_address`: strings holding JSON are parsed, other
    /// strings are wrapped as `{"address": ...}`.
    pub fn address(&self) -> Value {
        match &self.customer_address {
            Value::String(raw) => serde_json::from_str(raw)
                .unwrap_or_else(|_| serde_json::json!({ "address": raw })),
            other => other.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedService {
    pub name: String,
    pub name_ar: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedProvider {
    pub name: String,
    pub name_ar: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// One row of `users` from `/api/admin/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl User {
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            self.email.clone()
        } else {
            parts.join(" ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_admin_statistics_wire_shape() {
        let stats: AdminStatistics = serde_json::from_value(json!({
            "users": 120,
            "providers": 8,
            "services": 31,
            "bookings": 402,
            "revenue": {"total": 15000.5, "commission": 1500.05},
            "bookingsByStatus": {"pending": 4, "completed": 390}
        }))
        .unwrap();
        assert_eq!(stats.users, 120);
        assert_eq!(stats.bookings_by_status["completed"], 390);
        assert!(stats.recent_bookings.is_empty());
    }

    #[test]
    fn test_address_string_is_normalised() {
        let mut booking: BookingDetails = serde_json::from_value(json!({
            "id": "b-1",
            "status": "confirmed",
            "payment_status": "paid",
            "scheduled_at": "2026-10-14T09:00:00Z",
            "total_amount": 250.0,
            "currency": "SAR",
            "customer_address": "{\"city\":\"Riyadh\"}",
            "service": {"name": "Cleaning", "name_ar": "تنظيف"},
            "provider": {"name": "Sparkle", "name_ar": "سباركل"}
        }))
        .unwrap();
        assert_eq!(booking.address(), json!({"city": "Riyadh"}));

        booking.customer_address = json!("King Fahd Rd");
        assert_eq!(booking.address(), json!({"address": "King Fahd Rd"}));
    }

    #[test]
    fn test_user_display_name_falls_back_to_email() {
        let user: User = serde_json::from_value(json!({
            "id": "u1", "email": "a@b.sa", "role": "customer", "first_name": ""
        }))
        .unwrap();
        assert_eq!(user.display_name(), "a@b.sa");
    }
}
