//! create bid and bid_history tables.

use sea_orm_migration::prelude::*;

use super::m20260301_000002_create_tenders::Tender;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bid::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bid::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Bid::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Bid::Description).string_len(500).not_null())
                    .col(
                        ColumnDef::new(Bid::Status)
                            .string_len(20)
                            .not_null()
                            .default("Created"),
                    )
                    .col(ColumnDef::new(Bid::TenderId).uuid().not_null())
                    .col(ColumnDef::new(Bid::AuthorType).string_len(20).not_null())
                    // user or organization id depending on author_type
                    .col(ColumnDef::new(Bid::AuthorId).uuid().not_null())
                    .col(
                        ColumnDef::new(Bid::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Bid::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bid::Approvals)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Bid::Rejections)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bid_tender")
                            .from(Bid::Table, Bid::TenderId)
                            .to(Tender::Table, Tender::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bid_tender_id")
                    .table(Bid::Table)
                    .col(Bid::TenderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bid_author")
                    .table(Bid::Table)
                    .col(Bid::AuthorType)
                    .col(Bid::AuthorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BidHistory::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BidHistory::Id).uuid().not_null())
                    .col(ColumnDef::new(BidHistory::Version).integer().not_null())
                    .col(ColumnDef::new(BidHistory::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(BidHistory::Description)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BidHistory::Status).string_len(20).not_null())
                    .col(ColumnDef::new(BidHistory::TenderId).uuid().not_null())
                    .col(
                        ColumnDef::new(BidHistory::AuthorType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BidHistory::AuthorId).uuid().not_null())
                    .col(
                        ColumnDef::new(BidHistory::ArchivedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(BidHistory::Id)
                            .col(BidHistory::Version),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bid_history_bid")
                            .from(BidHistory::Table, BidHistory::Id)
                            .to(Bid::Table, Bid::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BidHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bid::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Bid {
    Table,
    Id,
    Name,
    Description,
    Status,
    TenderId,
    AuthorType,
    AuthorId,
    Version,
    CreatedAt,
    Approvals,
    Rejections,
}

#[derive(DeriveIden)]
enum BidHistory {
    Table,
    Id,
    Version,
    Name,
    Description,
    Status,
    TenderId,
    AuthorType,
    AuthorId,
    ArchivedAt,
}
