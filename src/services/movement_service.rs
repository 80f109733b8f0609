// src/services/movement_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, MovementRepository, PartnerRepository},
    models::movements::{MovementType, MovementWithRefs, NewMovement, StockMovement},
};

// Entrada de estoque (compra/reposição), já validada pelo handler.
#[derive(Debug)]
pub struct EntryInput {
    pub product_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub movement_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

// Saída de estoque (venda, perda, uso interno...).
#[derive(Debug)]
pub struct ExitInput {
    pub product_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
    pub reason: String,
    pub movement_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct MovementService {
    catalog_repo: CatalogRepository,
    partner_repo: PartnerRepository,
    movement_repo: MovementRepository,
    pool: PgPool,
}

impl MovementService {
    pub fn new(
        catalog_repo: CatalogRepository,
        partner_repo: PartnerRepository,
        movement_repo: MovementRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            catalog_repo,
            partner_repo,
            movement_repo,
            pool,
        }
    }

    /// Registra uma entrada: grava no livro-razão e incrementa a projeção
    /// `current_stock` na MESMA transação. O razão é a fonte de verdade;
    /// o saldo do produto é só um cache dele.
    pub async fn record_entry(
        &self,
        owner_id: Uuid,
        input: EntryInput,
    ) -> Result<StockMovement, AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava a linha do produto para serializar ajustes concorrentes.
        self.catalog_repo
            .get_product_for_update(&mut *tx, owner_id, input.product_id)
            .await?
            .ok_or(AppError::RecordNotFound("Produto"))?;

        // A referência de fornecedor precisa pertencer ao mesmo dono.
        if let Some(supplier_id) = input.supplier_id {
            self.partner_repo
                .get_supplier(&mut *tx, owner_id, supplier_id)
                .await?
                .ok_or(AppError::RecordNotFound("Fornecedor"))?;
        }

        let total_value = Decimal::from(input.quantity) * input.unit_price;

        let movement = self
            .movement_repo
            .insert_movement(
                &mut *tx,
                owner_id,
                &NewMovement {
                    product_id: input.product_id,
                    supplier_id: input.supplier_id,
                    customer_id: None,
                    movement_type: MovementType::In,
                    quantity: input.quantity,
                    unit_price: Some(input.unit_price),
                    total_value: Some(total_value),
                    movement_date: input.movement_date.unwrap_or_else(Utc::now),
                    reason: None,
                    notes: input.notes,
                },
            )
            .await?;

        self.catalog_repo
            .adjust_stock(&mut *tx, owner_id, input.product_id, input.quantity)
            .await?;

        tx.commit().await?;
        Ok(movement)
    }

    /// Registra uma saída, rejeitando quando o saldo disponível não cobre a
    /// quantidade pedida.
    pub async fn record_exit(
        &self,
        owner_id: Uuid,
        input: ExitInput,
    ) -> Result<StockMovement, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self
            .catalog_repo
            .get_product_for_update(&mut *tx, owner_id, input.product_id)
            .await?
            .ok_or(AppError::RecordNotFound("Produto"))?;

        if product.current_stock < input.quantity {
            return Err(AppError::InsufficientStock {
                available: product.current_stock,
                requested: input.quantity,
            });
        }

        if let Some(customer_id) = input.customer_id {
            self.partner_repo
                .get_customer(&mut *tx, owner_id, customer_id)
                .await?
                .ok_or(AppError::RecordNotFound("Cliente"))?;
        }

        let total_value = input
            .unit_price
            .map(|price| Decimal::from(input.quantity) * price);

        let movement = self
            .movement_repo
            .insert_movement(
                &mut *tx,
                owner_id,
                &NewMovement {
                    product_id: input.product_id,
                    supplier_id: None,
                    customer_id: input.customer_id,
                    movement_type: MovementType::Out,
                    quantity: input.quantity,
                    unit_price: input.unit_price,
                    total_value,
                    movement_date: input.movement_date.unwrap_or_else(Utc::now),
                    reason: Some(input.reason),
                    notes: input.notes,
                },
            )
            .await?;

        self.catalog_repo
            .adjust_stock(&mut *tx, owner_id, input.product_id, -input.quantity)
            .await?;

        tx.commit().await?;
        Ok(movement)
    }

    pub async fn list_movements(
        &self,
        owner_id: Uuid,
        movement_type: Option<MovementType>,
        product_id: Option<Uuid>,
    ) -> Result<Vec<MovementWithRefs>, AppError> {
        self.movement_repo
            .list_with_refs(owner_id, movement_type.map(|t| t.as_str()), product_id)
            .await
    }
}
