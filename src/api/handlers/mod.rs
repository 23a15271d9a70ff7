pub mod auth;
pub mod health;
pub mod materials;
pub mod upload;
