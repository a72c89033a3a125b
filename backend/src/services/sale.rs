//! Sales invoice service
//!
//! Creating an invoice prices its lines, then hands header, lines, stock
//! decrements and the customer charge to storage as one atomic write.

use std::sync::Arc;

use chrono::Utc;
use shared::models::{CreateSaleInput, Sale, SaleItem, SaleWithItems, UpdateSaleInput};
use shared::numbering::{document_number, DocumentKind};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::storage::Storage;

#[derive(Clone)]
pub struct SaleService {
    storage: Arc<dyn Storage>,
}

/// `INV-<millis>-<salt>`; the salt keeps numbers minted in the same
/// millisecond apart
pub(crate) fn next_number(kind: DocumentKind) -> String {
    let salt = Uuid::new_v4().as_u128() as u32;
    document_number(kind, Utc::now().timestamp_millis(), salt)
}

impl SaleService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> AppResult<Vec<Sale>> {
        self.storage.list_sales().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Sale> {
        self.storage
            .get_sale(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sale".to_string()))
    }

    /// Line items of a sale; empty for an unknown or deleted sale
    pub async fn items(&self, id: Uuid) -> AppResult<Vec<SaleItem>> {
        self.storage.list_sale_items(id).await
    }

    pub async fn create(&self, input: CreateSaleInput) -> AppResult<SaleWithItems> {
        input.validate()?;
        let draft = SaleWithItems::build(input, || next_number(DocumentKind::Invoice))?;
        self.storage.create_sale(&draft).await?;

        tracing::info!(
            sale_id = %draft.sale.id,
            invoice_number = %draft.sale.invoice_number,
            customer_id = %draft.sale.customer_id,
            items = draft.items.len(),
            total = %draft.sale.total_amount,
            "Sale recorded"
        );
        Ok(draft)
    }

    /// Header-only update; stock and balances are not re-reconciled
    pub async fn update(&self, id: Uuid, input: UpdateSaleInput) -> AppResult<Sale> {
        input.validate()?;
        let mut sale = self.get(id).await?;
        let previous = sale.status;
        sale.apply(input);
        if !self.storage.update_sale(&sale).await? {
            return Err(AppError::NotFound("Sale".to_string()));
        }
        if previous != sale.status {
            tracing::info!(sale_id = %id, from = %previous, to = %sale.status, "Sale status changed");
        }
        Ok(sale)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.storage.delete_sale(id).await? {
            return Err(AppError::NotFound("Sale".to_string()));
        }
        tracing::info!(sale_id = %id, "Sale deleted with its items");
        Ok(())
    }
}
