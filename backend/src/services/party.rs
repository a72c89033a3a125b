//! Customer and supplier services
//!
//! Outstanding balances grow with every invoice or bill and shrink through
//! explicit adjustments (recorded payments). Both floor at zero.

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::models::{
    CreateCustomerInput, CreateSupplierInput, Customer, Purchase, Sale, Supplier,
    UpdateCustomerInput, UpdateSupplierInput,
};
use shared::validation::{validate_amount, validate_balance_delta, validate_pan_number};
use shared::AdjustmentOutcome;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::storage::Storage;

fn check_delta(delta: Decimal) -> AppResult<()> {
    validate_balance_delta(delta).map_err(|m| AppError::validation("delta", m))
}

fn check_pan(pan: Option<&String>) -> AppResult<()> {
    if let Some(pan) = pan {
        validate_pan_number(pan).map_err(|m| AppError::validation("panNumber", m))?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct CustomerService {
    storage: Arc<dyn Storage>,
}

impl CustomerService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        self.storage.list_customers().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Customer> {
        self.storage
            .get_customer(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer".to_string()))
    }

    pub async fn create(&self, input: CreateCustomerInput) -> AppResult<Customer> {
        input.validate()?;
        check_pan(input.contact.pan_number.as_ref())?;
        if let Some(limit) = input.credit_limit {
            validate_amount(limit).map_err(|m| AppError::validation("creditLimit", m))?;
        }

        let customer = Customer::new(input);
        self.storage.insert_customer(&customer).await?;
        Ok(customer)
    }

    pub async fn update(&self, id: Uuid, input: UpdateCustomerInput) -> AppResult<Customer> {
        input.validate()?;
        check_pan(input.contact.pan_number.as_ref())?;
        if let Some(limit) = input.credit_limit {
            validate_amount(limit).map_err(|m| AppError::validation("creditLimit", m))?;
        }

        let mut customer = self.get(id).await?;
        customer.apply(input);
        if !self.storage.update_customer(&customer).await? {
            return Err(AppError::NotFound("Customer".to_string()));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.storage.delete_customer(id).await? {
            return Err(AppError::NotFound("Customer".to_string()));
        }
        Ok(())
    }

    pub async fn sales(&self, id: Uuid) -> AppResult<Vec<Sale>> {
        self.get(id).await?;
        self.storage.list_sales_for_customer(id).await
    }

    /// Apply a signed balance change; a negative delta records a payment
    pub async fn adjust_balance(&self, id: Uuid, delta: Decimal) -> AppResult<AdjustmentOutcome> {
        check_delta(delta)?;
        let applied = self.storage.adjust_customer_balance(id, delta).await?;
        if applied {
            tracing::info!(customer_id = %id, %delta, "Customer balance adjusted");
        } else {
            tracing::warn!(customer_id = %id, %delta, "Balance adjustment for unknown customer");
        }
        Ok(AdjustmentOutcome { id, applied })
    }
}

#[derive(Clone)]
pub struct SupplierService {
    storage: Arc<dyn Storage>,
}

impl SupplierService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> AppResult<Vec<Supplier>> {
        self.storage.list_suppliers().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Supplier> {
        self.storage
            .get_supplier(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))
    }

    pub async fn create(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        input.validate()?;
        check_pan(input.contact.pan_number.as_ref())?;

        let supplier = Supplier::new(input);
        self.storage.insert_supplier(&supplier).await?;
        Ok(supplier)
    }

    pub async fn update(&self, id: Uuid, input: UpdateSupplierInput) -> AppResult<Supplier> {
        input.validate()?;
        check_pan(input.contact.pan_number.as_ref())?;

        let mut supplier = self.get(id).await?;
        supplier.apply(input);
        if !self.storage.update_supplier(&supplier).await? {
            return Err(AppError::NotFound("Supplier".to_string()));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.storage.delete_supplier(id).await? {
            return Err(AppError::NotFound("Supplier".to_string()));
        }
        Ok(())
    }

    pub async fn purchases(&self, id: Uuid) -> AppResult<Vec<Purchase>> {
        self.get(id).await?;
        self.storage.list_purchases_for_supplier(id).await
    }

    pub async fn adjust_balance(&self, id: Uuid, delta: Decimal) -> AppResult<AdjustmentOutcome> {
        check_delta(delta)?;
        let applied = self.storage.adjust_supplier_balance(id, delta).await?;
        if applied {
            tracing::info!(supplier_id = %id, %delta, "Supplier balance adjusted");
        } else {
            tracing::warn!(supplier_id = %id, %delta, "Balance adjustment for unknown supplier");
        }
        Ok(AdjustmentOutcome { id, applied })
    }
}
