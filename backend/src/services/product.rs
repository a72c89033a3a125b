//! Product catalogue service
//!
//! Stock is read-only here. It changes only through sale and purchase lines.

use std::sync::Arc;

use shared::models::{CreateProductInput, Product, UpdateProductInput};
use shared::validation::{validate_amount, validate_sku, validate_unit_price};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::storage::Storage;

#[derive(Clone)]
pub struct ProductService {
    storage: Arc<dyn Storage>,
}

impl ProductService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> AppResult<Vec<Product>> {
        self.storage.list_products().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Product> {
        self.storage
            .get_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    pub async fn get_by_sku(&self, sku: &str) -> AppResult<Product> {
        self.storage
            .get_product_by_sku(sku)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        input.validate()?;
        validate_sku(&input.sku).map_err(|m| AppError::validation("sku", m))?;
        validate_unit_price(input.unit_price).map_err(|m| AppError::validation("unitPrice", m))?;
        if let Some(cost) = input.cost_price {
            validate_amount(cost).map_err(|m| AppError::validation("costPrice", m))?;
        }

        let product = Product::new(input);
        self.storage.insert_product(&product).await?;

        tracing::info!(product_id = %product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    pub async fn update(&self, id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        input.validate()?;
        if let Some(sku) = &input.sku {
            validate_sku(sku).map_err(|m| AppError::validation("sku", m))?;
        }
        if let Some(price) = input.unit_price {
            validate_unit_price(price).map_err(|m| AppError::validation("unitPrice", m))?;
        }
        if let Some(cost) = input.cost_price {
            validate_amount(cost).map_err(|m| AppError::validation("costPrice", m))?;
        }

        let mut product = self.get(id).await?;
        product.apply(input);
        if !self.storage.update_product(&product).await? {
            return Err(AppError::NotFound("Product".to_string()));
        }
        // Stock may have moved since the read above
        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.storage.delete_product(id).await? {
            return Err(AppError::NotFound("Product".to_string()));
        }
        Ok(())
    }
}
