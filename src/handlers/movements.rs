// src/handlers/movements.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_not_negative},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::movements::MovementType,
    services::movement_service::{EntryInput, ExitInput},
};

// --- DTO: Entrada de Estoque ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EntryPayload {
    pub product_id: Uuid,
    pub supplier_id: Option<Uuid>,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,

    // Quanto pagou por unidade (alimenta o custo médio).
    #[validate(custom(function = "validate_not_negative"))]
    pub unit_price: Decimal,

    pub movement_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

pub async fn record_entry(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<EntryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let movement = app_state
        .movement_service
        .record_entry(
            user.id,
            EntryInput {
                product_id: payload.product_id,
                supplier_id: payload.supplier_id,
                quantity: payload.quantity,
                unit_price: payload.unit_price,
                movement_date: payload.movement_date,
                notes: payload.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(movement)))
}

// --- DTO: Saída de Estoque ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExitPayload {
    pub product_id: Uuid,
    pub customer_id: Option<Uuid>,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,

    // Opcional: saídas como perda/descarte não têm preço.
    #[validate(custom(function = "validate_not_negative"))]
    pub unit_price: Option<Decimal>,

    // Ex: "Venda", "Perda", "Devolução", "Transferência", "Uso interno", "Descarte".
    #[validate(length(min = 1, message = "O motivo é obrigatório."))]
    pub reason: String,

    pub movement_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

pub async fn record_exit(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ExitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let movement = app_state
        .movement_service
        .record_exit(
            user.id,
            ExitInput {
                product_id: payload.product_id,
                customer_id: payload.customer_id,
                quantity: payload.quantity,
                unit_price: payload.unit_price,
                reason: payload.reason,
                movement_date: payload.movement_date,
                notes: payload.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(movement)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementFilters {
    #[serde(rename = "type")]
    pub movement_type: Option<MovementType>,
    pub product_id: Option<Uuid>,
}

pub async fn list_movements(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filters): Query<MovementFilters>,
) -> Result<impl IntoResponse, AppError> {
    let movements = app_state
        .movement_service
        .list_movements(user.id, filters.movement_type, filters.product_id)
        .await?;

    Ok((StatusCode::OK, Json(movements)))
}
