//! # Database Migrations
//!
//! Schema migrations for Plumbline, managed with sea-orm-migration.

pub mod db;
pub mod migrator;

mod m20260301_000001_create_users_table;
mod m20260301_000002_create_projects_table;
mod m20260301_000003_create_repairs_table;

pub use db::{DatabaseConfig, SeaDb, SslMode};
pub use migrator::Migrator;
pub use sea_orm_migration::MigratorTrait;
