//! Staff account service

use std::sync::Arc;

use bcrypt::{hash, DEFAULT_COST};
use shared::models::{CreateStaffInput, StaffMember, UpdateStaffInput};
use shared::validation::{validate_password, validate_username};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::storage::Storage;

#[derive(Clone)]
pub struct StaffService {
    storage: Arc<dyn Storage>,
    hash_cost: u32,
}

impl StaffService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            hash_cost: DEFAULT_COST,
        }
    }

    /// Override the bcrypt cost (tests use the minimum)
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        validate_password(password).map_err(|m| AppError::validation("password", m))?;
        hash(password, self.hash_cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    pub async fn list(&self) -> AppResult<Vec<StaffMember>> {
        self.storage.list_staff().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<StaffMember> {
        self.storage
            .get_staff(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Staff member".to_string()))
    }

    pub async fn create(&self, input: CreateStaffInput) -> AppResult<StaffMember> {
        input.validate()?;
        validate_username(&input.username).map_err(|m| AppError::validation("username", m))?;
        if self
            .storage
            .get_staff_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateEntry("username".to_string()));
        }

        let password_hash = self.hash_password(&input.password)?;
        let member = StaffMember::new(input, password_hash);
        self.storage.insert_staff(&member).await?;

        tracing::info!(staff_id = %member.id, username = %member.username, "Staff member created");
        Ok(member)
    }

    pub async fn update(&self, id: Uuid, input: UpdateStaffInput) -> AppResult<StaffMember> {
        input.validate()?;
        if let Some(username) = &input.username {
            validate_username(username).map_err(|m| AppError::validation("username", m))?;
        }
        let password_hash = input
            .password
            .as_deref()
            .map(|p| self.hash_password(p))
            .transpose()?;

        let mut member = self.get(id).await?;
        member.apply(input, password_hash);
        if !self.storage.update_staff(&member).await? {
            return Err(AppError::NotFound("Staff member".to_string()));
        }
        Ok(member)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.storage.delete_staff(id).await? {
            return Err(AppError::NotFound("Staff member".to_string()));
        }
        Ok(())
    }
}
