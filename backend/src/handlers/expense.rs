//! Expense handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use shared::models::{CreateExpenseInput, Expense, UpdateExpenseInput};
use uuid::Uuid;

use super::DeleteResponse;
use crate::error::AppResult;
use crate::services::ExpenseService;
use crate::AppState;

pub async fn list_expenses(State(state): State<AppState>) -> AppResult<Json<Vec<Expense>>> {
    let service = ExpenseService::new(state.storage);
    Ok(Json(service.list().await?))
}

pub async fn get_expense(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Expense>> {
    let Path(id) = path?;
    let service = ExpenseService::new(state.storage);
    Ok(Json(service.get(id).await?))
}

pub async fn create_expense(
    State(state): State<AppState>,
    payload: Result<Json<CreateExpenseInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let Json(input) = payload?;
    let service = ExpenseService::new(state.storage);
    let expense = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn update_expense(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateExpenseInput>, JsonRejection>,
) -> AppResult<Json<Expense>> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let service = ExpenseService::new(state.storage);
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<DeleteResponse>> {
    let Path(id) = path?;
    let service = ExpenseService::new(state.storage);
    service.delete(id).await?;
    Ok(Json(DeleteResponse::ok()))
}
