// src/db/movement_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::movements::{MovementWithRefs, NewMovement, StockMovement},
};

const MOVEMENT_REFS_SELECT: &str = r#"
    SELECT
        m.id, m.product_id, p.name AS product_name,
        m.supplier_id, s.name AS supplier_name,
        m.customer_id, c.name AS customer_name,
        m.movement_type, m.quantity, m.unit_price, m.total_value,
        m.movement_date, m.reason, m.notes, m.created_at
    FROM stock_movements m
    JOIN products p ON p.id = m.product_id AND p.user_id = m.user_id
    LEFT JOIN suppliers s ON s.id = m.supplier_id AND s.user_id = m.user_id
    LEFT JOIN customers c ON c.id = m.customer_id AND c.user_id = m.user_id
"#;

#[derive(Clone)]
pub struct MovementRepository {
    pool: PgPool,
}

impl MovementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grava uma linha no livro-razão. Roda dentro da transação que também
    /// ajusta a projeção `products.current_stock`.
    pub async fn insert_movement<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        movement: &NewMovement,
    ) -> Result<StockMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements (
                user_id, product_id, supplier_id, customer_id, movement_type,
                quantity, unit_price, total_value, movement_date, reason, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(movement.product_id)
        .bind(movement.supplier_id)
        .bind(movement.customer_id)
        .bind(movement.movement_type)
        .bind(movement.quantity)
        .bind(movement.unit_price)
        .bind(movement.total_value)
        .bind(movement.movement_date)
        .bind(movement.reason.as_deref())
        .bind(movement.notes.as_deref())
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    let constraint = db_err.constraint().unwrap_or_default();
                    if constraint.contains("supplier") {
                        return AppError::RecordNotFound("Fornecedor");
                    }
                    if constraint.contains("customer") {
                        return AppError::RecordNotFound("Cliente");
                    }
                    return AppError::RecordNotFound("Produto");
                }
            }
            e.into()
        })
    }

    /// Todas as movimentações do tenant, para o agregador em memória.
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<StockMovement>, AppError> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT * FROM stock_movements
            WHERE user_id = $1
            ORDER BY movement_date ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }

    /// Histórico com nomes resolvidos, filtrável por tipo e produto.
    pub async fn list_with_refs(
        &self,
        owner_id: Uuid,
        movement_type: Option<&str>,
        product_id: Option<Uuid>,
    ) -> Result<Vec<MovementWithRefs>, AppError> {
        let sql = format!(
            r#"{MOVEMENT_REFS_SELECT}
            WHERE m.user_id = $1
              AND ($2::text IS NULL OR m.movement_type = $2)
              AND ($3::uuid IS NULL OR m.product_id = $3)
            ORDER BY m.movement_date DESC, m.created_at DESC
            "#
        );

        let movements = sqlx::query_as::<_, MovementWithRefs>(&sql)
            .bind(owner_id)
            .bind(movement_type)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(movements)
    }

    pub async fn recent_with_refs(
        &self,
        owner_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MovementWithRefs>, AppError> {
        let sql = format!(
            r#"{MOVEMENT_REFS_SELECT}
            WHERE m.user_id = $1
            ORDER BY m.movement_date DESC, m.created_at DESC
            LIMIT $2
            "#
        );

        let movements = sqlx::query_as::<_, MovementWithRefs>(&sql)
            .bind(owner_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(movements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn historico_so_resolve_nomes_do_proprio_tenant() {
        // Os JOINs do histórico precisam casar o dono, senão uma movimentação
        // apontando para o parceiro de outro usuário exibiria o nome dele.
        assert!(MOVEMENT_REFS_SELECT.contains("p.user_id = m.user_id"));
        assert!(MOVEMENT_REFS_SELECT.contains("s.user_id = m.user_id"));
        assert!(MOVEMENT_REFS_SELECT.contains("c.user_id = m.user_id"));
    }
}
