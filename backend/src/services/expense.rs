//! Expense service

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::models::{CreateExpenseInput, Expense, UpdateExpenseInput};
use shared::validation::validate_amount;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::storage::Storage;

#[derive(Clone)]
pub struct ExpenseService {
    storage: Arc<dyn Storage>,
}

fn check_amounts(amount: Option<Decimal>, vat_amount: Option<Decimal>) -> AppResult<()> {
    if let Some(amount) = amount {
        validate_amount(amount).map_err(|m| AppError::validation("amount", m))?;
    }
    if let Some(vat) = vat_amount {
        validate_amount(vat).map_err(|m| AppError::validation("vatAmount", m))?;
    }
    Ok(())
}

impl ExpenseService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> AppResult<Vec<Expense>> {
        self.storage.list_expenses().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Expense> {
        self.storage
            .get_expense(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Expense".to_string()))
    }

    pub async fn create(&self, input: CreateExpenseInput) -> AppResult<Expense> {
        input.validate()?;
        check_amounts(Some(input.amount), input.vat_amount)?;

        let expense = Expense::new(input);
        self.storage.insert_expense(&expense).await?;
        Ok(expense)
    }

    pub async fn update(&self, id: Uuid, input: UpdateExpenseInput) -> AppResult<Expense> {
        input.validate()?;
        check_amounts(input.amount, input.vat_amount)?;

        let mut expense = self.get(id).await?;
        expense.apply(input);
        if !self.storage.update_expense(&expense).await? {
            return Err(AppError::NotFound("Expense".to_string()));
        }
        Ok(expense)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.storage.delete_expense(id).await? {
            return Err(AppError::NotFound("Expense".to_string()));
        }
        Ok(())
    }
}
