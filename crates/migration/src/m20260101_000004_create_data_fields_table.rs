//! Migration: Create data_fields with a single optional room reference
//!
//! A key is unique per room when the field belongs to one, and per
//! organization when it does not. Both rules are partial unique indexes.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DataFields::Table)
                    .if_not_exists()
                    .col(pk_uuid(DataFields::Id).default(Expr::cust("gen_random_uuid()")))
                    .col(uuid(DataFields::OrgId))
                    .col(string_len(DataFields::Name, 255))
                    .col(string_len(DataFields::VariableName, 255))
                    .col(text_null(DataFields::Description))
                    .col(string_len_null(DataFields::Unit, 50))
                    .col(string_len(DataFields::EntryInterval, 20).default("daily"))
                    .col(uuid_null(DataFields::RoomId))
                    .col(uuid_null(DataFields::CreatedBy))
                    .col(
                        timestamp_with_time_zone(DataFields::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_data_fields_org_id")
                    .from(DataFields::Table, DataFields::OrgId)
                    .to(Organizations::Table, Organizations::Id)
                    .on_delete(ForeignKeyAction::Cascade)
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
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_data_fields_created_by")
                    .from(DataFields::Table, DataFields::CreatedBy)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_data_fields_org_id")
                    .table(DataFields::Table)
                    .col(DataFields::OrgId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_data_fields_room_id")
                    .table(DataFields::Table)
                    .col(DataFields::RoomId)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE UNIQUE INDEX IF NOT EXISTS uq_data_field_org_variable_room
                    ON data_fields (org_id, variable_name, room_id)
                    WHERE room_id IS NOT NULL;
                CREATE UNIQUE INDEX IF NOT EXISTS uq_data_field_org_variable_no_room
                    ON data_fields (org_id, variable_name)
                    WHERE room_id IS NULL;
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DataFields::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DataFields {
    Table,
    Id,
    OrgId,
    Name,
    VariableName,
    Description,
    Unit,
    EntryInterval,
    RoomId,
    CreatedBy,
    CreatedAt,
}

// Reference to organizations table
#[derive(DeriveIden)]
pub enum Organizations {
    Table,
    Id,
}

// Reference to rooms table
#[derive(DeriveIden)]
pub enum Rooms {
    Table,
    Id,
}

// Reference to users table
#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
}
