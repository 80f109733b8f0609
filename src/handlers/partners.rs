// src/handlers/partners.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError, config::AppState, db::partner_repo::PartnerFields,
    middleware::auth::AuthenticatedUser,
};

// Mesmo cadastro para fornecedor e cliente.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartnerPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub document: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl PartnerPayload {
    fn as_fields(&self) -> PartnerFields<'_> {
        PartnerFields {
            name: &self.name,
            document: self.document.as_deref(),
            email: self.email.as_deref(),
            phone: self.phone.as_deref(),
            address: self.address.as_deref(),
            city: self.city.as_deref(),
            state: self.state.as_deref(),
            zip_code: self.zip_code.as_deref(),
        }
    }
}

// ---
// Fornecedores
// ---

pub async fn create_supplier(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<PartnerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let supplier = app_state
        .partner_service
        .create_supplier(user.id, &payload.as_fields())
        .await?;

    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn list_suppliers(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let suppliers = app_state.partner_service.list_suppliers(user.id).await?;
    Ok((StatusCode::OK, Json(suppliers)))
}

pub async fn update_supplier(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PartnerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let supplier = app_state
        .partner_service
        .update_supplier(user.id, id, &payload.as_fields())
        .await?;

    Ok((StatusCode::OK, Json(supplier)))
}

pub async fn delete_supplier(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.partner_service.delete_supplier(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Clientes
// ---

pub async fn create_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<PartnerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let customer = app_state
        .partner_service
        .create_customer(user.id, &payload.as_fields())
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn list_customers(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state.partner_service.list_customers(user.id).await?;
    Ok((StatusCode::OK, Json(customers)))
}

pub async fn update_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PartnerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let customer = app_state
        .partner_service
        .update_customer(user.id, id, &payload.as_fields())
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}

pub async fn delete_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.partner_service.delete_customer(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
