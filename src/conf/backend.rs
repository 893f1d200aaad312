use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resource::TenantContext;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    #[serde(default = "BackendConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "BackendConfig::default_tenant")]
    pub tenant: String,
    #[serde(
        with = "humantime_serde",
        default = "BackendConfig::default_timeout"
    )]
    pub timeout: Duration,
}

impl BackendConfig {
    fn default_base_url() -> String {
        String::from("http://localhost:3000")
    }

    fn default_tenant() -> String {
        String::from("demo")
    }

    fn default_timeout() -> Duration {
        Duration::from_secs(10)
    }

    pub fn tenant_context(&self) -> TenantContext {
        TenantContext::new(&self.tenant)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            tenant: Self::default_tenant(),
            timeout: Self::default_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_default() {
        let backend = BackendConfig::default();
        assert_eq!(backend.base_url, "http://localhost:3000");
        assert_eq!(backend.tenant, "demo");
        assert_eq!(backend.timeout, Duration::from_secs(10));
    }
}
