//! # Database Migrator
//!
//! This module implements the Sea-ORM migrator trait for managing database schema changes.
//! The migrator coordinates all migration operations and maintains the migration history.

use sea_orm_migration::prelude::*;

use crate::{
    m20260101_000001_create_organizations_table,
    m20260101_000002_create_users_table,
    m20260101_000003_create_rooms_table,
    m20260101_000004_create_data_fields_table,
    m20260224_000001_data_field_rooms_m2m,
};

/// Number of migrations that build the single-room schema.
pub const BASELINE_MIGRATIONS: u32 = 4;

/// The main migrator that coordinates all migration operations
///
/// On PostgreSQL, `Migrator::up` and `Migrator::down` run inside a single
/// transaction, so a failing migration leaves the schema as it was.
///
/// # Example
///
/// ```rust,ignore
/// use migration::{Migrator, MigratorTrait};
///
/// Migrator::up(&db, None).await?;
/// ```
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    /// Migrations are executed in the order they appear in this list.
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_organizations_table::Migration),
            Box::new(m20260101_000002_create_users_table::Migration),
            Box::new(m20260101_000003_create_rooms_table::Migration),
            Box::new(m20260101_000004_create_data_fields_table::Migration),
            Box::new(m20260224_000001_data_field_rooms_m2m::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_order() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted, "migrations must be listed in name order");
        assert_eq!(names.len(), BASELINE_MIGRATIONS as usize + 1);
        assert_eq!(names.last(), Some(&crate::data_field_rooms_migration_name()));
    }
}
