// src/handlers/reports.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use crate::{common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser};

pub async fn stock_report(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.report_service.stock_report(user.id).await?;
    Ok((StatusCode::OK, Json(report)))
}

pub async fn dashboard(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    // O relógio entra aqui, na borda: o agregador recebe o "agora" como argumento.
    let dashboard = app_state
        .report_service
        .dashboard(user.id, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(dashboard)))
}
