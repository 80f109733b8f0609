// src/db/catalog_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{Category, Product},
};

// Campos editáveis de um produto. `current_stock` fica de fora de propósito:
// o saldo só muda via movimentação (ver MovementService).
#[derive(Debug)]
pub struct ProductFields<'a> {
    pub category_id: Option<Uuid>,
    pub code: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub unit_measure: &'a str,
    pub cost_price: Option<rust_decimal::Decimal>,
    pub sale_price: Option<rust_decimal::Decimal>,
    pub min_stock: i32,
    pub max_stock: Option<i32>,
}

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Categorias
    // ---

    pub async fn list_categories(&self, owner_id: Uuid) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn create_category(
        &self,
        owner_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (user_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::NameAlreadyExists(name.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn update_category(
        &self,
        owner_id: Uuid,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $3, description = $4
            WHERE id = $2 AND user_id = $1
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::NameAlreadyExists(name.to_string());
                }
            }
            AppError::from(e)
        })?
        .ok_or(AppError::RecordNotFound("Categoria"))
    }

    pub async fn delete_category(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $2 AND user_id = $1")
            .bind(owner_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::RecordInUse("Categoria");
                    }
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("Categoria"));
        }
        Ok(())
    }

    /// Busca escopada pelo dono; valida a referência de categoria de um
    /// produto antes da gravação.
    pub async fn get_category<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE id = $2 AND user_id = $1",
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(category)
    }

    // ---
    // Produtos
    // ---

    pub async fn list_products(&self, owner_id: Uuid) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        fields: &ProductFields<'_>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                user_id, category_id, code, name, description, unit_measure,
                cost_price, sale_price, min_stock, max_stock
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(fields.category_id)
        .bind(fields.code)
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.unit_measure)
        .bind(fields.cost_price)
        .bind(fields.sale_price)
        .bind(fields.min_stock)
        .bind(fields.max_stock)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::CodeAlreadyExists(fields.code.to_string());
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::RecordNotFound("Categoria");
                }
            }
            e.into()
        })
    }

    pub async fn update_product(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: &ProductFields<'_>,
    ) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET category_id = $3, code = $4, name = $5, description = $6,
                unit_measure = $7, cost_price = $8, sale_price = $9,
                min_stock = $10, max_stock = $11, updated_at = now()
            WHERE id = $2 AND user_id = $1
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .bind(fields.category_id)
        .bind(fields.code)
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.unit_measure)
        .bind(fields.cost_price)
        .bind(fields.sale_price)
        .bind(fields.min_stock)
        .bind(fields.max_stock)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::CodeAlreadyExists(fields.code.to_string());
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::RecordNotFound("Categoria");
                }
            }
            AppError::from(e)
        })?
        .ok_or(AppError::RecordNotFound("Produto"))
    }

    pub async fn delete_product(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $2 AND user_id = $1")
            .bind(owner_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        // Há movimentações apontando para ele: o histórico é permanente.
                        return AppError::RecordInUse("Produto");
                    }
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("Produto"));
        }
        Ok(())
    }

    /// Trava a linha do produto dentro da transação corrente (FOR UPDATE),
    /// para validar saldo sem corrida entre duas saídas simultâneas.
    pub async fn get_product_for_update<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = $2 AND user_id = $1 FOR UPDATE",
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    /// Aplica um delta (positivo ou negativo) à projeção `current_stock`.
    /// Sempre chamado na mesma transação que insere a movimentação.
    pub async fn adjust_stock<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        id: Uuid,
        delta: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET current_stock = current_stock + $3, updated_at = now()
            WHERE id = $2 AND user_id = $1
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .bind(delta)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::RecordNotFound("Produto"))?;

        Ok(product)
    }
}
