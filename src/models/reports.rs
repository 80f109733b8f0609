// src/models/reports.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::movements::MovementWithRefs;
use crate::services::valuation::{ActivitySummary, PortfolioSummary, StockStatus};

// Uma linha do relatório de estoque (Consulta de Estoque).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReportRow {
    pub product_id: Uuid,
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub supplier: Option<String>, // fornecedor da última entrada
    pub current_stock: i32,
    pub min_stock: i32,
    pub max_stock: Option<i32>,
    pub average_cost: Decimal,
    pub last_entry_price: Option<Decimal>,
    pub entries_count: u32,
    pub total_value: Decimal,
    pub status: StockStatus,
    pub last_movement: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReportResponse {
    pub summary: PortfolioSummary,
    pub items: Vec<StockReportRow>,
}

// Alerta de reposição exibido no dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockAlert {
    pub product_id: Uuid,
    pub name: String,
    pub current_stock: i32,
    pub min_stock: i32,
    pub status: StockStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub summary: PortfolioSummary,
    pub active_suppliers: i64,
    pub activity: ActivitySummary,
    pub recent_movements: Vec<MovementWithRefs>,
    pub low_stock_products: Vec<LowStockAlert>,
}
