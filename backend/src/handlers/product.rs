//! Product handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use shared::models::{CreateProductInput, Product, UpdateProductInput};
use uuid::Uuid;

use super::DeleteResponse;
use crate::error::AppResult;
use crate::services::ProductService;
use crate::AppState;

pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.storage);
    Ok(Json(service.list().await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Product>> {
    let Path(id) = path?;
    let service = ProductService::new(state.storage);
    Ok(Json(service.get(id).await?))
}

pub async fn get_product_by_sku(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<Product>> {
    let Path(sku) = path?;
    let service = ProductService::new(state.storage);
    Ok(Json(service.get_by_sku(&sku).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let Json(input) = payload?;
    let service = ProductService::new(state.storage);
    let product = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateProductInput>, JsonRejection>,
) -> AppResult<Json<Product>> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let service = ProductService::new(state.storage);
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<DeleteResponse>> {
    let Path(id) = path?;
    let service = ProductService::new(state.storage);
    service.delete(id).await?;
    Ok(Json(DeleteResponse::ok()))
}
