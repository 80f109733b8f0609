pub mod auth;
pub mod catalog_service;
pub mod movement_service;
pub mod partner_service;
pub mod report_service;
pub mod valuation;
