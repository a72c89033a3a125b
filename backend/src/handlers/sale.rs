//! Sale handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use shared::models::{CreateSaleInput, Sale, SaleItem, SaleWithItems, UpdateSaleInput};
use uuid::Uuid;

use super::DeleteResponse;
use crate::error::AppResult;
use crate::services::SaleService;
use crate::AppState;

pub async fn list_sales(State(state): State<AppState>) -> AppResult<Json<Vec<Sale>>> {
    let service = SaleService::new(state.storage);
    Ok(Json(service.list().await?))
}

pub async fn get_sale(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Sale>> {
    let Path(id) = path?;
    let service = SaleService::new(state.storage);
    Ok(Json(service.get(id).await?))
}

/// Line items of a sale; unknown ids yield an empty list
pub async fn list_sale_items(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Vec<SaleItem>>> {
    let Path(id) = path?;
    let service = SaleService::new(state.storage);
    Ok(Json(service.items(id).await?))
}

/// Create a sale with its line items, moving stock and the customer balance
pub async fn create_sale(
    State(state): State<AppState>,
    payload: Result<Json<CreateSaleInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<SaleWithItems>)> {
    let Json(input) = payload?;
    let service = SaleService::new(state.storage);
    let sale = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn update_sale(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateSaleInput>, JsonRejection>,
) -> AppResult<Json<Sale>> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let service = SaleService::new(state.storage);
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete_sale(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<DeleteResponse>> {
    let Path(id) = path?;
    let service = SaleService::new(state.storage);
    service.delete(id).await?;
    Ok(Json(DeleteResponse::ok()))
}
