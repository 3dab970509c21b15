use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260301_000001_create_users_table::Users,
    m20260301_000002_create_projects_table::Projects,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Repairs::Table)
                    .if_not_exists()
                    .col(text(Repairs::Id).not_null().primary_key())
                    .col(text(Repairs::ProjectId).not_null())
                    .col(string(Repairs::ProjectName).not_null())
                    .col(string(Repairs::ElevationName).not_null())
                    .col(integer(Repairs::Drop).not_null())
                    .col(integer(Repairs::Level).not_null())
                    .col(integer(Repairs::RepairIndex).not_null())
                    .col(string(Repairs::Status).not_null().default("pending"))
                    .col(json_binary(Repairs::Phases).not_null())
                    .col(text(Repairs::CreatedByUserId).not_null())
                    .col(string(Repairs::CreatedByUserName).not_null())
                    .col(
                        timestamp_with_time_zone(Repairs::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Repairs::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_repairs_project_id")
                            .from(Repairs::Table, Repairs::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_repairs_created_by_user_id")
                            .from(Repairs::Table, Repairs::CreatedByUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Location lookups: next-index computation and the column-filter path
        // both key on (project, elevation, drop, level). The repair type lives
        // inside the phases JSON, so index uniqueness per location+type is
        // enforced by the state machine, not the schema.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_repairs_location")
                    .table(Repairs::Table)
                    .col(Repairs::ProjectId)
                    .col(Repairs::ElevationName)
                    .col(Repairs::Drop)
                    .col(Repairs::Level)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_repairs_status")
                    .table(Repairs::Table)
                    .col(Repairs::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_repairs_created_at")
                    .table(Repairs::Table)
                    .col(Repairs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Repairs::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Repairs {
    Table,
    Id,
    ProjectId,
    ProjectName,
    ElevationName,
    Drop,
    Level,
    RepairIndex,
    Status,
    Phases,
    CreatedByUserId,
    CreatedByUserName,
    CreatedAt,
    UpdatedAt,
}
