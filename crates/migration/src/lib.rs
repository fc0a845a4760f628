//! # Pulse Schema Migrations
//!
//! Sea-ORM migrations for the data field tables, plus the planning helpers the
//! `data_field_rooms` migration is built from.

pub use sea_orm_migration::prelude::*;

pub mod assignments;
pub mod conflicts;
pub mod db;
mod migrator;

mod m20260101_000001_create_organizations_table;
mod m20260101_000002_create_users_table;
mod m20260101_000003_create_rooms_table;
mod m20260101_000004_create_data_fields_table;
pub mod m20260224_000001_data_field_rooms_m2m;

pub use migrator::{BASELINE_MIGRATIONS, Migrator};

/// Name under which the room-assignment migration is recorded in `seaql_migrations`.
pub fn data_field_rooms_migration_name() -> String {
    MigrationName::name(&m20260224_000001_data_field_rooms_m2m::Migration).to_string()
}
