//! Staff accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::{empty_string_as_none, StaffRole};

/// A staff member. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: StaffRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffInput {
    pub username: String,
    pub password: String,
    #[validate(length(min = 1, max = 200, message = "Full name is required"))]
    pub full_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    pub role: Option<StaffRole>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaffInput {
    pub username: Option<String>,
    pub password: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    pub role: Option<StaffRole>,
    pub is_active: Option<bool>,
}

impl StaffMember {
    pub fn new(input: CreateStaffInput, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: input.username,
            password_hash,
            full_name: input.full_name,
            email: input.email,
            phone: input.phone,
            role: input.role.unwrap_or_default(),
            is_active: input.is_active.unwrap_or(true),
            created_at: Utc::now(),
        }
    }

    /// Apply an update whose password, if any, has already been hashed
    pub fn apply(&mut self, update: UpdateStaffInput, password_hash: Option<String>) {
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }
        if let Some(full_name) = update.full_name {
            self.full_name = full_name;
        }
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let input: CreateStaffInput = serde_json::from_str(
            r#"{"username": "ram", "password": "s3cret-pass", "fullName": "Ram Sharma", "role": "accountant"}"#,
        )
        .unwrap();
        let member = StaffMember::new(input, "$2b$12$hash".into());
        let json = serde_json::to_value(&member).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "accountant");
        assert_eq!(json["fullName"], "Ram Sharma");
    }

    #[test]
    fn role_defaults_to_staff() {
        let input: CreateStaffInput = serde_json::from_str(
            r#"{"username": "sita", "password": "another-pass", "fullName": "Sita"}"#,
        )
        .unwrap();
        assert_eq!(StaffMember::new(input, String::new()).role, StaffRole::Staff);
    }
}
