// src/services/catalog_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{catalog_repo::ProductFields, CatalogRepository, MovementRepository},
    models::{
        catalog::{Category, Product},
        movements::{MovementType, NewMovement},
    },
};

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
    movement_repo: MovementRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(
        catalog_repo: CatalogRepository,
        movement_repo: MovementRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            catalog_repo,
            movement_repo,
            pool,
        }
    }

    // ---
    // Categorias
    // ---

    pub async fn list_categories(&self, owner_id: Uuid) -> Result<Vec<Category>, AppError> {
        self.catalog_repo.list_categories(owner_id).await
    }

    pub async fn create_category(
        &self,
        owner_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, AppError> {
        self.catalog_repo
            .create_category(owner_id, name, description)
            .await
    }

    pub async fn update_category(
        &self,
        owner_id: Uuid,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, AppError> {
        self.catalog_repo
            .update_category(owner_id, id, name, description)
            .await
    }

    pub async fn delete_category(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.catalog_repo.delete_category(owner_id, id).await
    }

    // ---
    // Produtos
    // ---

    pub async fn list_products(&self, owner_id: Uuid) -> Result<Vec<Product>, AppError> {
        self.catalog_repo.list_products(owner_id).await
    }

    /// Cria o produto e, se houver estoque inicial, já registra a entrada
    /// correspondente no livro-razão na mesma transação. Assim o saldo do
    /// produto nunca existe sem uma movimentação que o explique.
    pub async fn create_product(
        &self,
        owner_id: Uuid,
        fields: &ProductFields<'_>,
        initial_stock: i32,
    ) -> Result<Product, AppError> {
        self.check_category(owner_id, fields.category_id).await?;

        if initial_stock <= 0 {
            return self.catalog_repo.create_product(&self.pool, owner_id, fields).await;
        }

        let mut tx = self.pool.begin().await?;

        let product = self
            .catalog_repo
            .create_product(&mut *tx, owner_id, fields)
            .await?;

        let unit_price = fields.cost_price;
        self.movement_repo
            .insert_movement(
                &mut *tx,
                owner_id,
                &NewMovement {
                    product_id: product.id,
                    supplier_id: None,
                    customer_id: None,
                    movement_type: MovementType::In,
                    quantity: initial_stock,
                    unit_price,
                    total_value: unit_price.map(|p| Decimal::from(initial_stock) * p),
                    movement_date: Utc::now(),
                    reason: Some("Estoque inicial".to_string()),
                    notes: Some("Criação de produto".to_string()),
                },
            )
            .await?;

        let product = self
            .catalog_repo
            .adjust_stock(&mut *tx, owner_id, product.id, initial_stock)
            .await?;

        tx.commit().await?;
        Ok(product)
    }

    pub async fn update_product(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: &ProductFields<'_>,
    ) -> Result<Product, AppError> {
        self.check_category(owner_id, fields.category_id).await?;
        self.catalog_repo.update_product(owner_id, id, fields).await
    }

    pub async fn delete_product(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.catalog_repo.delete_product(owner_id, id).await
    }

    // Uma categoria referenciada precisa existir E pertencer ao mesmo dono.
    async fn check_category(
        &self,
        owner_id: Uuid,
        category_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        if let Some(category_id) = category_id {
            self.catalog_repo
                .get_category(&self.pool, owner_id, category_id)
                .await?
                .ok_or(AppError::RecordNotFound("Categoria"))?;
        }
        Ok(())
    }
}
