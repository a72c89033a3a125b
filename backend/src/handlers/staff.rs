//! Staff account handlers
//!
//! Password hashes never leave the server; `StaffMember` skips them when
//! serialized.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use shared::models::{CreateStaffInput, StaffMember, UpdateStaffInput};
use uuid::Uuid;

use super::DeleteResponse;
use crate::error::AppResult;
use crate::services::StaffService;
use crate::AppState;

fn staff_service(state: AppState) -> StaffService {
    StaffService::new(state.storage).with_hash_cost(state.config.security.bcrypt_cost)
}

pub async fn list_staff(State(state): State<AppState>) -> AppResult<Json<Vec<StaffMember>>> {
    Ok(Json(staff_service(state).list().await?))
}

pub async fn get_staff(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<StaffMember>> {
    let Path(id) = path?;
    Ok(Json(staff_service(state).get(id).await?))
}

pub async fn create_staff(
    State(state): State<AppState>,
    payload: Result<Json<CreateStaffInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<StaffMember>)> {
    let Json(input) = payload?;
    let member = staff_service(state).create(input).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn update_staff(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateStaffInput>, JsonRejection>,
) -> AppResult<Json<StaffMember>> {
    let Path(id) = path?;
    let Json(input) = payload?;
    Ok(Json(staff_service(state).update(id, input).await?))
}

pub async fn delete_staff(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<DeleteResponse>> {
    let Path(id) = path?;
    staff_service(state).delete(id).await?;
    Ok(Json(DeleteResponse::ok()))
}
