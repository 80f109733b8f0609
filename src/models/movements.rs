// src/models/movements.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Gravado como TEXT ('in' | 'out') no banco.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    In,
    Out,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "in",
            MovementType::Out => "out",
        }
    }
}

// --- STOCK MOVEMENT (livro-razão, append-only) ---
// `total_value` é sempre derivado de quantity * unit_price na gravação;
// nunca aceitamos o valor vindo do cliente, para não divergir dos fatores.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
    pub total_value: Option<Decimal>,
    pub movement_date: DateTime<Utc>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Linha do histórico com os nomes já resolvidos (JOIN), para exibição.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MovementWithRefs {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub supplier_id: Option<Uuid>,
    pub supplier_name: Option<String>,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
    pub total_value: Option<Decimal>,
    pub movement_date: DateTime<Utc>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Dados de uma nova movimentação, já validados pelo service.
#[derive(Debug)]
pub struct NewMovement {
    pub product_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
    pub total_value: Option<Decimal>,
    pub movement_date: DateTime<Utc>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}
