// src/services/partner_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{partner_repo::PartnerFields, PartnerRepository},
    models::partners::{Customer, Supplier},
};

#[derive(Clone)]
pub struct PartnerService {
    repo: PartnerRepository,
}

impl PartnerService {
    pub fn new(repo: PartnerRepository) -> Self {
        Self { repo }
    }

    pub async fn list_suppliers(&self, owner_id: Uuid) -> Result<Vec<Supplier>, AppError> {
        self.repo.list_suppliers(owner_id).await
    }

    pub async fn create_supplier(
        &self,
        owner_id: Uuid,
        fields: &PartnerFields<'_>,
    ) -> Result<Supplier, AppError> {
        self.repo.create_supplier(owner_id, fields).await
    }

    pub async fn update_supplier(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: &PartnerFields<'_>,
    ) -> Result<Supplier, AppError> {
        self.repo.update_supplier(owner_id, id, fields).await
    }

    pub async fn delete_supplier(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.repo.delete_supplier(owner_id, id).await
    }

    pub async fn list_customers(&self, owner_id: Uuid) -> Result<Vec<Customer>, AppError> {
        self.repo.list_customers(owner_id).await
    }

    pub async fn create_customer(
        &self,
        owner_id: Uuid,
        fields: &PartnerFields<'_>,
    ) -> Result<Customer, AppError> {
        self.repo.create_customer(owner_id, fields).await
    }

    pub async fn update_customer(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: &PartnerFields<'_>,
    ) -> Result<Customer, AppError> {
        self.repo.update_customer(owner_id, id, fields).await
    }

    pub async fn delete_customer(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.repo.delete_customer(owner_id, id).await
    }
}
