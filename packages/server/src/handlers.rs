//! HTTP handler functions for the collision report API.

use actix_web::{HttpResponse, web};
use collision_report_server_models::{ApiHealth, ReportRequest, ReportResponse};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/metadata`
///
/// Returns the distinct values available for each filter control.
pub async fn metadata(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(&state.metadata)
}

/// `POST /api/report`
///
/// Parses the free-text search, merges it with the explicit selections
/// (parsed slots win), filters the dataset, and generates the report.
pub async fn report(state: web::Data<AppState>, body: web::Json<ReportRequest>) -> HttpResponse {
    let parsed = collision_report_query::parse(
        body.search.as_deref().unwrap_or_default(),
        &state.metadata,
    );

    let spec = body.to_spec().with_parsed(parsed);
    let view = collision_report_filter::apply(state.dataset, &spec);
    let report = collision_report_report::generate(&view, None);

    log::info!(
        "Generated report: {} of {} records matched",
        report.total,
        state.dataset.len()
    );

    let message = format!("Report generated successfully: {} records found.", report.total);
    HttpResponse::Ok().json(ReportResponse {
        message,
        total: report.total,
        applied: spec,
        report,
    })
}
