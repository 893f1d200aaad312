use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::DashError;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Provider,
    ProviderStaff,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Provider => "provider",
            Role::ProviderStaff => "provider_staff",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "provider" => Ok(Role::Provider),
            "provider_staff" => Ok(Role::ProviderStaff),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(DashError::InvalidRequest(format!("unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Suspended,
    PendingVerification,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
            UserStatus::PendingVerification => "pending_verification",
        };
        f.write_str(name)
    }
}

/// Body of a create or update call on `/api/admin/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    pub email: String,
    /// Empty on update means "keep the current password".
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl UserForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: None,
            last_name: None,
            phone: None,
            role,
            status: Some(UserStatus::Active),
        }
    }

    pub fn validate_for_create(&self) -> Result<(), DashError> {
        self.check_email()?;
        check_password(&self.password)
    }

    pub fn validate_for_update(&self) -> Result<(), DashError> {
        self.check_email()?;
        if self.password.is_empty() {
            return Ok(());
        }
        check_password(&self.password)
    }

    /// JSON body for an update; an empty password is left out.
    pub fn update_body(&self) -> Result<Value, DashError> {
        let mut body = serde_json::to_value(self)?;
        if self.password.is_empty() {
            if let Some(map) = body.as_object_mut() {
                map.remove("password");
            }
        }
        Ok(body)
    }

    fn check_email(&self) -> Result<(), DashError> {
        if looks_like_email(&self.email) {
            Ok(())
        } else {
            Err(DashError::InvalidRequest(format!(
                "'{}' is not a valid email",
                self.email
            )))
        }
    }
}

fn check_password(password: &str) -> Result<(), DashError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DashError::InvalidRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("sara@example.sa", true)]
    #[case("a.b@mail.co.uk", true)]
    #[case("sara@", false)]
    #[case("@example.sa", false)]
    #[case("sara@example", false)]
    #[case("sara@example.", false)]
    #[case("sa ra@example.sa", false)]
    #[case("a@b@c.sa", false)]
    fn test_email_shape(#[case] email: &str, #[case] valid: bool) {
        assert_eq!(looks_like_email(email), valid);
    }

    #[test]
    fn test_password_rules_differ_by_mode() {
        let mut form = UserForm::new("sara@example.sa", "", Role::Customer);
        assert!(form.validate_for_create().is_err());
        assert!(form.validate_for_update().is_ok());

        form.password = "12345".into();
        assert!(form.validate_for_update().is_err());
        form.password = "123456".into();
        assert!(form.validate_for_create().is_ok());
    }

    #[test]
    fn test_wire_shape() {
        let mut form = UserForm::new("sara@example.sa", "", Role::ProviderStaff);
        form.first_name = Some("Sara".into());
        form.status = Some(UserStatus::PendingVerification);

        assert_eq!(
            form.update_body().unwrap(),
            json!({
                "email": "sara@example.sa",
                "firstName": "Sara",
                "role": "provider_staff",
                "status": "pending_verification"
            })
        );
    }

    #[test]
    fn test_role_parses() {
        assert_eq!("super_admin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert!("root".parse::<Role>().is_err());
    }
}
