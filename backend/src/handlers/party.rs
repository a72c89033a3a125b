//! Customer and supplier handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use shared::models::{
    CreateCustomerInput, CreateSupplierInput, Customer, Purchase, Sale, Supplier,
    UpdateCustomerInput, UpdateSupplierInput,
};
use shared::{AdjustmentOutcome, BalanceAdjustment};
use uuid::Uuid;

use super::DeleteResponse;
use crate::error::{AppError, AppResult};
use crate::services::{CustomerService, SupplierService};
use crate::AppState;

// ============================================================================
// Customers
// ============================================================================

pub async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    let service = CustomerService::new(state.storage);
    Ok(Json(service.list().await?))
}

pub async fn get_customer(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Customer>> {
    let Path(id) = path?;
    let service = CustomerService::new(state.storage);
    Ok(Json(service.get(id).await?))
}

pub async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<CreateCustomerInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let Json(input) = payload?;
    let service = CustomerService::new(state.storage);
    let customer = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn update_customer(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateCustomerInput>, JsonRejection>,
) -> AppResult<Json<Customer>> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let service = CustomerService::new(state.storage);
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<DeleteResponse>> {
    let Path(id) = path?;
    let service = CustomerService::new(state.storage);
    service.delete(id).await?;
    Ok(Json(DeleteResponse::ok()))
}

pub async fn list_customer_sales(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Vec<Sale>>> {
    let Path(id) = path?;
    let service = CustomerService::new(state.storage);
    Ok(Json(service.sales(id).await?))
}

/// Record a payment (negative delta) or a manual charge against a customer
pub async fn adjust_customer_balance(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<BalanceAdjustment>, JsonRejection>,
) -> AppResult<Json<AdjustmentOutcome>> {
    let Path(id) = path?;
    let Json(adjustment) = payload?;
    let service = CustomerService::new(state.storage);
    let outcome = service.adjust_balance(id, adjustment.delta).await?;
    if !outcome.applied {
        return Err(AppError::NotFound("Customer".to_string()));
    }
    Ok(Json(outcome))
}

// ============================================================================
// Suppliers
// ============================================================================

pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.storage);
    Ok(Json(service.list().await?))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Supplier>> {
    let Path(id) = path?;
    let service = SupplierService::new(state.storage);
    Ok(Json(service.get(id).await?))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    payload: Result<Json<CreateSupplierInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    let Json(input) = payload?;
    let service = SupplierService::new(state.storage);
    let supplier = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn update_supplier(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateSupplierInput>, JsonRejection>,
) -> AppResult<Json<Supplier>> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let service = SupplierService::new(state.storage);
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<DeleteResponse>> {
    let Path(id) = path?;
    let service = SupplierService::new(state.storage);
    service.delete(id).await?;
    Ok(Json(DeleteResponse::ok()))
}

pub async fn list_supplier_purchases(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Vec<Purchase>>> {
    let Path(id) = path?;
    let service = SupplierService::new(state.storage);
    Ok(Json(service.purchases(id).await?))
}

pub async fn adjust_supplier_balance(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<BalanceAdjustment>, JsonRejection>,
) -> AppResult<Json<AdjustmentOutcome>> {
    let Path(id) = path?;
    let Json(adjustment) = payload?;
    let service = SupplierService::new(state.storage);
    let outcome = service.adjust_balance(id, adjustment.delta).await?;
    if !outcome.applied {
        return Err(AppError::NotFound("Supplier".to_string()));
    }
    Ok(Json(outcome))
}
