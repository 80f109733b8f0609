// src/db/partner_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::partners::{Customer, Supplier},
};

// Dados cadastrais comuns a fornecedores e clientes.
#[derive(Debug)]
pub struct PartnerFields<'a> {
    pub name: &'a str,
    pub document: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub zip_code: Option<&'a str>,
}

#[derive(Clone)]
pub struct PartnerRepository {
    pool: PgPool,
}

impl PartnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Fornecedores
    // ---

    pub async fn list_suppliers(&self, owner_id: Uuid) -> Result<Vec<Supplier>, AppError> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            "SELECT * FROM suppliers WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(suppliers)
    }

    /// Busca escopada pelo dono, usada para validar a referência de uma
    /// movimentação antes de gravá-la.
    pub async fn get_supplier<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Supplier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supplier = sqlx::query_as::<_, Supplier>(
            "SELECT * FROM suppliers WHERE id = $2 AND user_id = $1",
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(supplier)
    }

    pub async fn count_suppliers(&self, owner_id: Uuid) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM suppliers WHERE user_id = $1")
                .bind(owner_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn create_supplier(
        &self,
        owner_id: Uuid,
        fields: &PartnerFields<'_>,
    ) -> Result<Supplier, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (user_id, name, document, email, phone, address, city, state, zip_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(fields.name)
        .bind(fields.document)
        .bind(fields.email)
        .bind(fields.phone)
        .bind(fields.address)
        .bind(fields.city)
        .bind(fields.state)
        .bind(fields.zip_code)
        .fetch_one(&self.pool)
        .await?;
        Ok(supplier)
    }

    pub async fn update_supplier(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: &PartnerFields<'_>,
    ) -> Result<Supplier, AppError> {
        sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
            SET name = $3, document = $4, email = $5, phone = $6,
                address = $7, city = $8, state = $9, zip_code = $10, updated_at = now()
            WHERE id = $2 AND user_id = $1
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .bind(fields.name)
        .bind(fields.document)
        .bind(fields.email)
        .bind(fields.phone)
        .bind(fields.address)
        .bind(fields.city)
        .bind(fields.state)
        .bind(fields.zip_code)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::RecordNotFound("Fornecedor"))
    }

    pub async fn delete_supplier(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $2 AND user_id = $1")
            .bind(owner_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::RecordInUse("Fornecedor");
                    }
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("Fornecedor"));
        }
        Ok(())
    }

    // ---
    // Clientes
    // ---

    pub async fn list_customers(&self, owner_id: Uuid) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    pub async fn get_customer<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE id = $2 AND user_id = $1",
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(customer)
    }

    pub async fn create_customer(
        &self,
        owner_id: Uuid,
        fields: &PartnerFields<'_>,
    ) -> Result<Customer, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (user_id, name, document, email, phone, address, city, state, zip_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(fields.name)
        .bind(fields.document)
        .bind(fields.email)
        .bind(fields.phone)
        .bind(fields.address)
        .bind(fields.city)
        .bind(fields.state)
        .bind(fields.zip_code)
        .fetch_one(&self.pool)
        .await?;
        Ok(customer)
    }

    pub async fn update_customer(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: &PartnerFields<'_>,
    ) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET name = $3, document = $4, email = $5, phone = $6,
                address = $7, city = $8, state = $9, zip_code = $10, updated_at = now()
            WHERE id = $2 AND user_id = $1
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .bind(fields.name)
        .bind(fields.document)
        .bind(fields.email)
        .bind(fields.phone)
        .bind(fields.address)
        .bind(fields.city)
        .bind(fields.state)
        .bind(fields.zip_code)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::RecordNotFound("Cliente"))
    }

    pub async fn delete_customer(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $2 AND user_id = $1")
            .bind(owner_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::RecordInUse("Cliente");
                    }
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("Cliente"));
        }
        Ok(())
    }
}
