//! create tender and tender_history tables.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_identity::{Employee, Organization};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tender::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tender::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Tender::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Tender::Description).string_len(500).not_null())
                    .col(ColumnDef::new(Tender::ServiceType).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Tender::Status)
                            .string_len(20)
                            .not_null()
                            .default("Created"),
                    )
                    .col(ColumnDef::new(Tender::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Tender::CreatorId).uuid())
                    .col(
                        ColumnDef::new(Tender::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Tender::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tender_organization")
                            .from(Tender::Table, Tender::OrganizationId)
                            .to(Organization::Table, Organization::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tender_creator")
                            .from(Tender::Table, Tender::CreatorId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tender_organization_id")
                    .table(Tender::Table)
                    .col(Tender::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tender_creator_id")
                    .table(Tender::Table)
                    .col(Tender::CreatorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TenderHistory::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TenderHistory::Id).uuid().not_null())
                    .col(ColumnDef::new(TenderHistory::Version).integer().not_null())
                    .col(
                        ColumnDef::new(TenderHistory::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TenderHistory::Description)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TenderHistory::ServiceType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TenderHistory::Status)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TenderHistory::OrganizationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TenderHistory::ArchivedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(TenderHistory::Id)
                            .col(TenderHistory::Version),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tender_history_tender")
                            .from(TenderHistory::Table, TenderHistory::Id)
                            .to(Tender::Table, Tender::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TenderHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tender::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Tender {
    Table,
    Id,
    Name,
    Description,
    ServiceType,
    Status,
    OrganizationId,
    CreatorId,
    Version,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TenderHistory {
    Table,
    Id,
    Version,
    Name,
    Description,
    ServiceType,
    Status,
    OrganizationId,
    ArchivedAt,
}
