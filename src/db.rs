pub mod user_repo;
pub use user_repo::UserRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod partner_repo;
pub use partner_repo::PartnerRepository;
pub mod movement_repo;
pub use movement_repo::MovementRepository;
