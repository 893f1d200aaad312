use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::actions::{Confirm, UserForm};
use crate::client::{Transport, decode_ack};
use crate::core::DashError;
use crate::poller::ResourceHandle;
use crate::resource::{Method, ResourceRequest, TenantContext, User};

const USERS_ENDPOINT: &str = "/api/admin/users";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Delete,
    Activate,
    Deactivate,
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BulkAction::Delete => "delete",
            BulkAction::Activate => "activate",
            BulkAction::Deactivate => "deactivate",
        };
        f.write_str(name)
    }
}

/// User administration calls for one tenant.
///
/// With a list handle attached, every successful mutation refreshes it so the
/// table shows the change on the next commit.
pub struct UserAdmin {
    transport: Arc<dyn Transport>,
    tenant: TenantContext,
    confirm: Arc<dyn Confirm>,
    list: Option<ResourceHandle<Vec<User>>>,
}

impl UserAdmin {
    pub fn new(
        transport: Arc<dyn Transport>,
        tenant: TenantContext,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        Self {
            transport,
            tenant,
            confirm,
            list: None,
        }
    }

    pub fn with_list(mut self, list: ResourceHandle<Vec<User>>) -> Self {
        self.list = Some(list);
        self
    }

    pub async fn create(&self, form: &UserForm) -> Result<Value, DashError> {
        form.validate_for_create()?;
        let request = self
            .request(Method::Post, USERS_ENDPOINT.to_string())
            .with_body(serde_json::to_value(form)?);
        let body = self.send(request).await?;
        info!("Created user '{}'", form.email);
        Ok(body)
    }

    pub async fn update(&self, user_id: &str, form: &UserForm) -> Result<Value, DashError> {
        form.validate_for_update()?;
        let request = self
            .request(Method::Put, format!("{USERS_ENDPOINT}/{user_id}"))
            .with_body(form.update_body()?);
        let body = self.send(request).await?;
        info!("Updated user '{}'", user_id);
        Ok(body)
    }

    pub async fn delete(&self, user_id: &str) -> Result<(), DashError> {
        self.ask("Are you sure you want to delete this user?").await?;
        let request = self.request(Method::Delete, format!("{USERS_ENDPOINT}/{user_id}"));
        self.send(request).await?;
        info!("Deleted user '{}'", user_id);
        Ok(())
    }

    pub async fn bulk(&self, action: BulkAction, user_ids: &[String]) -> Result<(), DashError> {
        if user_ids.is_empty() {
            return Err(DashError::InvalidRequest("no users selected".to_string()));
        }
        self.ask(&format!(
            "Are you sure you want to {} {} users?",
            action,
            user_ids.len()
        ))
        .await?;

        let request = self
            .request(Method::Post, format!("{USERS_ENDPOINT}/bulk"))
            .with_body(json!({ "action": action, "userIds": user_ids }));
        self.send(request).await?;
        info!("Bulk {} applied to {} users", action, user_ids.len());
        Ok(())
    }

    fn request(&self, method: Method, endpoint: String) -> ResourceRequest {
        ResourceRequest::new(method, endpoint).with_tenant(&self.tenant)
    }

    async fn ask(&self, prompt: &str) -> Result<(), DashError> {
        if self.confirm.confirm(prompt).await {
            Ok(())
        } else {
            debug!("Declined: {}", prompt);
            Err(DashError::Declined(prompt.to_string()))
        }
    }

    async fn send(&self, request: ResourceRequest) -> Result<Value, DashError> {
        let raw = self.transport.execute(&request).await?;
        let body = decode_ack(&raw)?;
        if let Some(list) = &self.list {
            if let Err(e) = list.refresh() {
                debug!("List refresh skipped: {}", e);
            }
        }
        Ok(body)
    }
}
