//! Migration: Replace `data_fields.room_id` with the `data_field_rooms` junction table
//!
//! Forward:
//! 1. rename data fields whose `(org_id, variable_name)` would collide once the
//!    room no longer scopes the key (see [`crate::conflicts`])
//! 2. create `data_field_rooms`
//! 3. copy each valid `room_id` into it, stamped with the field's `created_at`
//! 4. drop the partial unique indexes scoped by room
//! 5. add the unique constraint `uq_data_field_org_variable (org_id, variable_name)`
//! 6. drop `room_id` with its index and foreign key
//!
//! Reverse is lossy: each field gets back the room of its earliest assignment
//! and every other assignment is discarded (see [`crate::assignments`]).
//!
//! On PostgreSQL the migrator runs the whole procedure in one transaction, so
//! a failure at any step leaves the previous shape untouched.

use logging::log_migration_step;
use sea_orm_migration::{prelude::*, schema::*};

use crate::{assignments, conflicts};

const MIGRATION: &str = "data_field_rooms_m2m";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        log_migration_step!(MIGRATION, 1, "Resolving data field key conflicts");
        let report = conflicts::resolve_conflicts(conn).await?;
        log_migration_step!(
            MIGRATION,
            1,
            "Key conflicts resolved",
            scanned = report.scanned,
            renamed = report.renames.len()
        );

        log_migration_step!(MIGRATION, 2, "Creating data_field_rooms");
        create_junction_table(manager).await?;

        log_migration_step!(MIGRATION, 3, "Backfilling room assignments");
        let plan = assignments::backfill(conn).await?;
        log_migration_step!(
            MIGRATION,
            3,
            "Room assignments backfilled",
            inserted = plan.assignments.len(),
            skipped_dangling = plan.dangling.len()
        );

        log_migration_step!(MIGRATION, 4, "Dropping room-scoped unique indexes");
        conn.execute_unprepared(
            r#"
            DROP INDEX IF EXISTS uq_data_field_org_variable_room;
            DROP INDEX IF EXISTS uq_data_field_org_variable_no_room;
            "#,
        )
        .await?;

        log_migration_step!(MIGRATION, 5, "Adding organization-wide unique key");
        conn.execute_unprepared(
            r#"
            ALTER TABLE data_fields
                ADD CONSTRAINT uq_data_field_org_variable UNIQUE (org_id, variable_name);
            "#,
        )
        .await?;

        log_migration_step!(MIGRATION, 6, "Dropping data_fields.room_id");
        manager
            .drop_index(
                Index::drop()
                    .name("ix_data_fields_room_id")
                    .table(DataFields::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name("fk_data_fields_room_id")
                    .table(DataFields::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(DataFields::Table)
                    .drop_column(DataFields::RoomId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        log_migration_step!(MIGRATION, 1, "Restoring data_fields.room_id");
        manager
            .alter_table(
                Table::alter()
                    .table(DataFields::Table)
                    .add_column(uuid_null(DataFields::RoomId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_data_fields_room_id")
                    .from(DataFields::Table, DataFields::RoomId)
                    .to(Rooms::Table, Rooms::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_data_fields_room_id")
                    .table(DataFields::Table)
                    .col(DataFields::RoomId)
                    .to_owned(),
            )
            .await?;

        log_migration_step!(MIGRATION, 2, "Collapsing assignments to earliest room");
        let plan = assignments::collapse(conn).await?;
        log_migration_step!(
            MIGRATION,
            2,
            "Assignments collapsed",
            restored = plan.restored.len(),
            lossy_fields = plan.lossy_fields.len(),
            discarded = plan.discarded_assignments
        );

        log_migration_step!(MIGRATION, 3, "Restoring room-scoped unique indexes");
        conn.execute_unprepared(
            r#"
            ALTER TABLE data_fields DROP CONSTRAINT uq_data_field_org_variable;
            CREATE UNIQUE INDEX uq_data_field_org_variable_room
                ON data_fields (org_id, variable_name, room_id)
                WHERE room_id IS NOT NULL;
            CREATE UNIQUE INDEX uq_data_field_org_variable_no_room
                ON data_fields (org_id, variable_name)
                WHERE room_id IS NULL;
            "#,
        )
        .await?;

        log_migration_step!(MIGRATION, 4, "Dropping data_field_rooms");
        manager
            .drop_table(Table::drop().table(DataFieldRooms::Table).to_owned())
            .await?;

        Ok(())
    }
}

async fn create_junction_table(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(DataFieldRooms::Table)
                .col(pk_uuid(DataFieldRooms::Id).default(Expr::cust("gen_random_uuid()")))
                .col(uuid(DataFieldRooms::DataFieldId))
                .col(uuid(DataFieldRooms::RoomId))
                .col(
                    timestamp_with_time_zone(DataFieldRooms::AssignedAt)
                        .default(Expr::current_timestamp()),
                )
                .to_owned(),
        )
        .await?;

    // A field cannot be assigned to the same room twice
    manager
        .get_connection()
        .execute_unprepared(
            r#"
            ALTER TABLE data_field_rooms
                ADD CONSTRAINT uq_data_field_room UNIQUE (data_field_id, room_id);
            "#,
        )
        .await?;

    manager
        .create_foreign_key(
            ForeignKey::create()
                .name("fk_data_field_rooms_data_field_id")
                .from(DataFieldRooms::Table, DataFieldRooms::DataFieldId)
                .to(DataFields::Table, DataFields::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .to_owned(),
        )
        .await?;

    manager
        .create_foreign_key(
            ForeignKey::create()
                .name("fk_data_field_rooms_room_id")
                .from(DataFieldRooms::Table, DataFieldRooms::RoomId)
                .to(Rooms::Table, Rooms::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("ix_data_field_rooms_data_field_id")
                .table(DataFieldRooms::Table)
                .col(DataFieldRooms::DataFieldId)
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("ix_data_field_rooms_room_id")
                .table(DataFieldRooms::Table)
                .col(DataFieldRooms::RoomId)
                .to_owned(),
        )
        .await?;

    Ok(())
}

#[derive(DeriveIden)]
pub enum DataFields {
    Table,
    Id,
    RoomId,
}

#[derive(DeriveIden)]
pub enum DataFieldRooms {
    Table,
    Id,
    DataFieldId,
    RoomId,
    AssignedAt,
}

// Reference to rooms table
#[derive(DeriveIden)]
pub enum Rooms {
    Table,
    Id,
}
