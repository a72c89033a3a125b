//! Category handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use shared::models::{Category, CreateCategoryInput, UpdateCategoryInput};
use uuid::Uuid;

use super::DeleteResponse;
use crate::error::AppResult;
use crate::services::CategoryService;
use crate::AppState;

pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let service = CategoryService::new(state.storage);
    Ok(Json(service.list().await?))
}

pub async fn get_category(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Category>> {
    let Path(id) = path?;
    let service = CategoryService::new(state.storage);
    Ok(Json(service.get(id).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CreateCategoryInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let Json(input) = payload?;
    let service = CategoryService::new(state.storage);
    let category = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateCategoryInput>, JsonRejection>,
) -> AppResult<Json<Category>> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let service = CategoryService::new(state.storage);
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<DeleteResponse>> {
    let Path(id) = path?;
    let service = CategoryService::new(state.storage);
    service.delete(id).await?;
    Ok(Json(DeleteResponse::ok()))
}
