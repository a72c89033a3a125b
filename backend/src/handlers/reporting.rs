//! Dashboard and financial report handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::reports::{DashboardStats, ReportLine};

use crate::error::AppResult;
use crate::services::reporting::{ReportFilter, ReportFormat, ReportingService};
use crate::AppState;

fn reporting_service(state: AppState) -> ReportingService {
    ReportingService::new(state.storage, state.config.reports.expense_month_rule())
}

/// Render a report as JSON, or as a CSV attachment of its metric lines
fn render<T: Serialize>(
    format: ReportFormat,
    report: T,
    lines: Vec<ReportLine>,
    filename: &str,
) -> AppResult<Response> {
    match format {
        ReportFormat::Csv => {
            let csv = ReportingService::export_to_csv(&lines)?;
            let disposition = format!("attachment; filename=\"{}\"", filename);
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                csv,
            )
                .into_response())
        }
        ReportFormat::Json => Ok(Json(report).into_response()),
    }
}

/// Get dashboard statistics
pub async fn get_dashboard_stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let stats = reporting_service(state).dashboard().await?;
    Ok(Json(stats))
}

/// Get the profit and loss report
pub async fn get_profit_loss_report(
    State(state): State<AppState>,
    query: Result<Query<ReportFilter>, QueryRejection>,
) -> AppResult<Response> {
    let Query(filter) = query?;
    let range = filter.range()?;
    let report = reporting_service(state).profit_loss(range).await?;
    let lines = report.lines();
    render(filter.format, report, lines, "profit_loss.csv")
}

/// Get the VAT report
pub async fn get_vat_report(
    State(state): State<AppState>,
    query: Result<Query<ReportFilter>, QueryRejection>,
) -> AppResult<Response> {
    let Query(filter) = query?;
    let range = filter.range()?;
    let report = reporting_service(state).vat(range).await?;
    let lines = report.lines();
    render(filter.format, report, lines, "vat.csv")
}
