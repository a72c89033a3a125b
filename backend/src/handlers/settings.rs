//! Company settings handlers

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use shared::models::{CompanySettings, UpdateCompanySettingsInput};

use crate::error::AppResult;
use crate::services::SettingsService;
use crate::AppState;

pub async fn get_company_settings(
    State(state): State<AppState>,
) -> AppResult<Json<CompanySettings>> {
    let service = SettingsService::new(state.storage);
    Ok(Json(service.get().await?))
}

pub async fn update_company_settings(
    State(state): State<AppState>,
    payload: Result<Json<UpdateCompanySettingsInput>, JsonRejection>,
) -> AppResult<Json<CompanySettings>> {
    let Json(input) = payload?;
    let service = SettingsService::new(state.storage);
    Ok(Json(service.update(input).await?))
}
