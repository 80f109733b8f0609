// src/config.rs

use crate::{
    db::{CatalogRepository, MovementRepository, PartnerRepository, UserRepository},
    services::{
        auth::AuthService, catalog_service::CatalogService, movement_service::MovementService,
        partner_service::PartnerService, report_service::ReportService,
    },
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub partner_service: PartnerService,
    pub movement_service: MovementService,
    pub report_service: ReportService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let partner_repo = PartnerRepository::new(db_pool.clone());
        let movement_repo = MovementRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret.clone(), db_pool.clone());
        let catalog_service =
            CatalogService::new(catalog_repo.clone(), movement_repo.clone(), db_pool.clone());
        let partner_service = PartnerService::new(partner_repo.clone());
        let movement_service = MovementService::new(
            catalog_repo.clone(),
            partner_repo.clone(),
            movement_repo.clone(),
            db_pool.clone(),
        );
        let report_service =
            ReportService::new(catalog_repo, partner_repo, movement_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            catalog_service,
            partner_service,
            movement_service,
            report_service,
        })
    }
}
