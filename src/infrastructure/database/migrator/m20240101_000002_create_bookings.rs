//! Create bookings table
//!
//! One row per hourly-slot reservation. Occupancy is derived from these
//! rows at query time; the composite slot index backs the per-slot
//! count and window queries.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_stations::Stations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::OwnerId).string().not_null())
                    .col(ColumnDef::new(Bookings::StationId).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::ReservationDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::Hour).integer().not_null())
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::AccessToken).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_station")
                            .from(Bookings::Table, Bookings::StationId)
                            .to(Stations::Table, Stations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_slot")
                    .table(Bookings::Table)
                    .col(Bookings::StationId)
                    .col(Bookings::ReservationDate)
                    .col(Bookings::Hour)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_owner")
                    .table(Bookings::Table)
                    .col(Bookings::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_status")
                    .table(Bookings::Table)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    OwnerId,
    StationId,
    ReservationDate,
    Hour,
    Status,
    CreatedAt,
    AccessToken,
}
