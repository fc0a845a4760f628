use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(pk_uuid(Rooms::Id).default(Expr::cust("gen_random_uuid()")))
                    .col(uuid(Rooms::OrgId))
                    .col(string(Rooms::Name))
                    .col(timestamp_with_time_zone(Rooms::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_rooms_org_id")
                    .from(Rooms::Table, Rooms::OrgId)
                    .to(Organizations::Table, Organizations::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_rooms_org_id")
                    .table(Rooms::Table)
                    .col(Rooms::OrgId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Rooms {
    Table,
    Id,
    OrgId,
    Name,
    CreatedAt,
}

// Reference to organizations table
#[derive(DeriveIden)]
pub enum Organizations {
    Table,
    Id,
}
