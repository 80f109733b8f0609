// src/services/report_service.rs
//
// Monta o relatório de estoque e o dashboard: busca as coleções do tenant
// em bloco e delega toda a matemática ao módulo `valuation`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, MovementRepository, PartnerRepository},
    models::{
        movements::{MovementType, StockMovement},
        reports::{DashboardResponse, LowStockAlert, StockReportResponse, StockReportRow},
    },
    services::valuation::{self, EntryCostStats, StockStatus},
};

const RECENT_MOVEMENTS_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct ReportService {
    catalog_repo: CatalogRepository,
    partner_repo: PartnerRepository,
    movement_repo: MovementRepository,
}

impl ReportService {
    pub fn new(
        catalog_repo: CatalogRepository,
        partner_repo: PartnerRepository,
        movement_repo: MovementRepository,
    ) -> Self {
        Self {
            catalog_repo,
            partner_repo,
            movement_repo,
        }
    }

    pub async fn stock_report(&self, owner_id: Uuid) -> Result<StockReportResponse, AppError> {
        let products = self.catalog_repo.list_products(owner_id).await?;
        let categories = self.catalog_repo.list_categories(owner_id).await?;
        let suppliers = self.partner_repo.list_suppliers(owner_id).await?;
        let movements = self.movement_repo.list_by_owner(owner_id).await?;

        let category_names: HashMap<Uuid, String> =
            categories.into_iter().map(|c| (c.id, c.name)).collect();
        let supplier_names: HashMap<Uuid, String> =
            suppliers.into_iter().map(|s| (s.id, s.name)).collect();

        let costs = valuation::entry_cost_index(&products, &movements);
        let recency = movement_recency(&movements);

        let items = products
            .iter()
            .map(|p| {
                let stats = costs.get(&p.id).cloned().unwrap_or_else(|| EntryCostStats {
                    average_entry_price: p.cost_price.unwrap_or(Decimal::ZERO),
                    last_entry_price: None,
                    entries_count: 0,
                });
                let stock = Decimal::from(p.current_stock.max(0));

                StockReportRow {
                    product_id: p.id,
                    code: p.code.clone(),
                    name: p.name.clone(),
                    category: p
                        .category_id
                        .and_then(|id| category_names.get(&id).cloned()),
                    supplier: recency
                        .get(&p.id)
                        .and_then(|r| r.last_entry_supplier)
                        .and_then(|id| supplier_names.get(&id).cloned()),
                    current_stock: p.current_stock,
                    min_stock: p.min_stock,
                    max_stock: p.max_stock,
                    average_cost: stats.average_entry_price,
                    last_entry_price: stats.last_entry_price,
                    entries_count: stats.entries_count,
                    total_value: stock * stats.average_entry_price,
                    status: valuation::classify(p.current_stock, p.min_stock),
                    last_movement: recency.get(&p.id).map(|r| r.last_movement),
                }
            })
            .collect();

        let summary = valuation::summarize(&products, &costs);

        Ok(StockReportResponse { summary, items })
    }

    pub async fn dashboard(
        &self,
        owner_id: Uuid,
        reference_now: DateTime<Utc>,
    ) -> Result<DashboardResponse, AppError> {
        let products = self.catalog_repo.list_products(owner_id).await?;
        let movements = self.movement_repo.list_by_owner(owner_id).await?;
        let active_suppliers = self.partner_repo.count_suppliers(owner_id).await?;
        let recent_movements = self
            .movement_repo
            .recent_with_refs(owner_id, RECENT_MOVEMENTS_LIMIT)
            .await?;

        let costs = valuation::entry_cost_index(&products, &movements);
        let summary = valuation::summarize(&products, &costs);
        let activity = valuation::activity(&movements, reference_now);

        let mut low_stock_products: Vec<LowStockAlert> = products
            .iter()
            .filter_map(|p| {
                let status = valuation::classify(p.current_stock, p.min_stock);
                status.needs_restock().then(|| LowStockAlert {
                    product_id: p.id,
                    name: p.name.clone(),
                    current_stock: p.current_stock,
                    min_stock: p.min_stock,
                    status,
                })
            })
            .collect();
        // Os mais urgentes primeiro: críticos, depois menor saldo.
        low_stock_products.sort_by_key(|a| {
            (
                !matches!(a.status, StockStatus::Critical),
                a.current_stock,
            )
        });

        Ok(DashboardResponse {
            summary,
            active_suppliers,
            activity,
            recent_movements,
            low_stock_products,
        })
    }
}

struct Recency {
    last_movement: DateTime<Utc>,
    // Fornecedor da entrada mais recente, só para exibição.
    last_entry_supplier: Option<Uuid>,
}

fn movement_recency(movements: &[StockMovement]) -> HashMap<Uuid, Recency> {
    let mut index: HashMap<Uuid, Recency> = HashMap::new();
    let mut last_entry_key: HashMap<Uuid, (DateTime<Utc>, Uuid)> = HashMap::new();

    for m in movements {
        let entry = index.entry(m.product_id).or_insert(Recency {
            last_movement: m.movement_date,
            last_entry_supplier: None,
        });
        if m.movement_date > entry.last_movement {
            entry.last_movement = m.movement_date;
        }

        if m.movement_type == MovementType::In {
            let newer = match last_entry_key.get(&m.product_id) {
                Some(&(date, id)) => (m.movement_date, m.id) > (date, id),
                None => true,
            };
            if newer {
                last_entry_key.insert(m.product_id, (m.movement_date, m.id));
                entry.last_entry_supplier = m.supplier_id;
            }
        }
    }

    index
}
