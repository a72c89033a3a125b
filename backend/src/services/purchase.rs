//! Purchase bill service

use std::sync::Arc;

use shared::models::{
    CreatePurchaseInput, Purchase, PurchaseItem, PurchaseWithItems, UpdatePurchaseInput,
};
use shared::numbering::DocumentKind;
use uuid::Uuid;
use validator::Validate;

use super::sale::next_number;
use crate::error::{AppError, AppResult};
use crate::storage::Storage;

#[derive(Clone)]
pub struct PurchaseService {
    storage: Arc<dyn Storage>,
}

impl PurchaseService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> AppResult<Vec<Purchase>> {
        self.storage.list_purchases().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Purchase> {
        self.storage
            .get_purchase(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Purchase".to_string()))
    }

    pub async fn items(&self, id: Uuid) -> AppResult<Vec<PurchaseItem>> {
        self.storage.list_purchase_items(id).await
    }

    /// Record a bill: stock goes up by each line's quantity and the supplier
    /// is owed the bill total
    pub async fn create(&self, input: CreatePurchaseInput) -> AppResult<PurchaseWithItems> {
        input.validate()?;
        let draft = PurchaseWithItems::build(input, || next_number(DocumentKind::Bill))?;
        self.storage.create_purchase(&draft).await?;

        tracing::info!(
            purchase_id = %draft.purchase.id,
            bill_number = %draft.purchase.bill_number,
            supplier_id = %draft.purchase.supplier_id,
            items = draft.items.len(),
            total = %draft.purchase.total_amount,
            "Purchase recorded"
        );
        Ok(draft)
    }

    pub async fn update(&self, id: Uuid, input: UpdatePurchaseInput) -> AppResult<Purchase> {
        input.validate()?;
        let mut purchase = self.get(id).await?;
        purchase.apply(input);
        if !self.storage.update_purchase(&purchase).await? {
            return Err(AppError::NotFound("Purchase".to_string()));
        }
        Ok(purchase)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.storage.delete_purchase(id).await? {
            return Err(AppError::NotFound("Purchase".to_string()));
        }
        Ok(())
    }
}
