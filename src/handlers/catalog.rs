// src/handlers/catalog.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_not_negative},
    config::AppState,
    db::catalog_repo::ProductFields,
    middleware::auth::AuthenticatedUser,
};

// ---
// Categorias
// ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
}

pub async fn create_category(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let category = app_state
        .catalog_service
        .create_category(user.id, &payload.name, payload.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list_categories(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.catalog_service.list_categories(user.id).await?;
    Ok((StatusCode::OK, Json(categories)))
}

pub async fn update_category(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let category = app_state
        .catalog_service
        .update_category(user.id, id, &payload.name, payload.description.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(category)))
}

pub async fn delete_category(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_category(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Produtos
// ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O código é obrigatório."))]
    pub code: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub description: Option<String>,
    pub category_id: Option<Uuid>,

    #[validate(length(min = 1, message = "A unidade de medida é obrigatória."))]
    pub unit_measure: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub cost_price: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    pub sale_price: Option<Decimal>,

    // Saldo inicial. Gera uma entrada "Estoque inicial" no livro-razão.
    #[validate(range(min = 0, message = "O estoque inicial não pode ser negativo."))]
    #[serde(default)]
    pub initial_stock: i32,

    #[validate(range(min = 0, message = "O estoque mínimo não pode ser negativo."))]
    #[serde(default)]
    pub min_stock: i32,

    #[validate(range(min = 0, message = "O estoque máximo não pode ser negativo."))]
    pub max_stock: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O código é obrigatório."))]
    pub code: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub description: Option<String>,
    pub category_id: Option<Uuid>,

    #[validate(length(min = 1, message = "A unidade de medida é obrigatória."))]
    pub unit_measure: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub cost_price: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    pub sale_price: Option<Decimal>,

    #[validate(range(min = 0, message = "O estoque mínimo não pode ser negativo."))]
    #[serde(default)]
    pub min_stock: i32,

    #[validate(range(min = 0, message = "O estoque máximo não pode ser negativo."))]
    pub max_stock: Option<i32>,
}

pub async fn create_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let fields = ProductFields {
        category_id: payload.category_id,
        code: &payload.code,
        name: &payload.name,
        description: payload.description.as_deref(),
        unit_measure: &payload.unit_measure,
        cost_price: payload.cost_price,
        sale_price: payload.sale_price,
        min_stock: payload.min_stock,
        max_stock: payload.max_stock,
    };

    let product = app_state
        .catalog_service
        .create_product(user.id, &fields, payload.initial_stock)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.catalog_service.list_products(user.id).await?;
    Ok((StatusCode::OK, Json(products)))
}

pub async fn update_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let fields = ProductFields {
        category_id: payload.category_id,
        code: &payload.code,
        name: &payload.name,
        description: payload.description.as_deref(),
        unit_measure: &payload.unit_measure,
        cost_price: payload.cost_price,
        sale_price: payload.sale_price,
        min_stock: payload.min_stock,
        max_stock: payload.max_stock,
    };

    let product = app_state
        .catalog_service
        .update_product(user.id, id, &fields)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

pub async fn delete_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_product(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
