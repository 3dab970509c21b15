use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260301_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(text(Projects::Id).not_null().primary_key())
                    .col(string(Projects::Name).not_null())
                    .col(string(Projects::ClientName).not_null())
                    .col(text(Projects::ClientId).not_null())
                    .col(string(Projects::Status).not_null().default("pending"))
                    .col(json_binary(Projects::Elevations).not_null())
                    .col(json_binary(Projects::RepairTypes).not_null())
                    .col(json_binary(Projects::Technicians).not_null())
                    .col(text(Projects::CreatedByUserId).not_null())
                    .col(
                        timestamp_with_time_zone(Projects::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Projects::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone(Projects::DeletedAt).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_client_id")
                            .from(Projects::Table, Projects::ClientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_projects_client_id")
                    .table(Projects::Table)
                    .col(Projects::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_projects_status")
                    .table(Projects::Table)
                    .col(Projects::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Projects {
    Table,
    Id,
    Name,
    ClientName,
    ClientId,
    Status,
    Elevations,
    RepairTypes,
    Technicians,
    CreatedByUserId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
