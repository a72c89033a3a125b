//! Purchase handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use shared::models::{
    CreatePurchaseInput, Purchase, PurchaseItem, PurchaseWithItems, UpdatePurchaseInput,
};
use uuid::Uuid;

use super::DeleteResponse;
use crate::error::AppResult;
use crate::services::PurchaseService;
use crate::AppState;

pub async fn list_purchases(State(state): State<AppState>) -> AppResult<Json<Vec<Purchase>>> {
    let service = PurchaseService::new(state.storage);
    Ok(Json(service.list().await?))
}

pub async fn get_purchase(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Purchase>> {
    let Path(id) = path?;
    let service = PurchaseService::new(state.storage);
    Ok(Json(service.get(id).await?))
}

/// Line items of a purchase; unknown ids yield an empty list
pub async fn list_purchase_items(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Vec<PurchaseItem>>> {
    let Path(id) = path?;
    let service = PurchaseService::new(state.storage);
    Ok(Json(service.items(id).await?))
}

/// Create a purchase bill; stock and the supplier balance both grow
pub async fn create_purchase(
    State(state): State<AppState>,
    payload: Result<Json<CreatePurchaseInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PurchaseWithItems>)> {
    let Json(input) = payload?;
    let service = PurchaseService::new(state.storage);
    let purchase = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

pub async fn update_purchase(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdatePurchaseInput>, JsonRejection>,
) -> AppResult<Json<Purchase>> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let service = PurchaseService::new(state.storage);
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete_purchase(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<DeleteResponse>> {
    let Path(id) = path?;
    let service = PurchaseService::new(state.storage);
    service.delete(id).await?;
    Ok(Json(DeleteResponse::ok()))
}
