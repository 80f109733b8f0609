pub mod auth;
pub mod catalog;
pub mod movements;
pub mod partners;
pub mod reports;
