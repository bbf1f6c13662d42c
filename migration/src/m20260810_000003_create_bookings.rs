use sea_orm_migration::{prelude::*, schema::*};

use super::m20260810_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::UserId).not_null())
                    .col(string_len(Booking::PlaceId, 100).not_null())
                    .col(string_len_null(Booking::PlaceTitle, 255))
                    .col(
                        timestamp_with_time_zone(Booking::TimeBooked)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(double_null(Booking::Cost))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Booking history is queried by place id
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_place_id")
                    .table(Booking::Table)
                    .col(Booking::PlaceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    UserId,
    PlaceId,
    PlaceTitle,
    TimeBooked,
    Cost,
}
