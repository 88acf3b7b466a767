//! Database entities for SeaORM.

pub mod admin;
pub mod app;
pub mod user;
