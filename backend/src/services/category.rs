//! Product category service

use std::sync::Arc;

use shared::models::{Category, CreateCategoryInput, UpdateCategoryInput};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::storage::Storage;

#[derive(Clone)]
pub struct CategoryService {
    storage: Arc<dyn Storage>,
}

impl CategoryService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        self.storage.list_categories().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Category> {
        self.storage
            .get_category(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    pub async fn create(&self, input: CreateCategoryInput) -> AppResult<Category> {
        input.validate()?;
        let category = Category::new(input);
        self.storage.insert_category(&category).await?;
        Ok(category)
    }

    pub async fn update(&self, id: Uuid, input: UpdateCategoryInput) -> AppResult<Category> {
        input.validate()?;
        let mut category = self.get(id).await?;
        category.apply(input);
        if !self.storage.update_category(&category).await? {
            return Err(AppError::NotFound("Category".to_string()));
        }
        Ok(category)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.storage.delete_category(id).await? {
            return Err(AppError::NotFound("Category".to_string()));
        }
        tracing::info!(category_id = %id, "Category deleted, products detached");
        Ok(())
    }
}
