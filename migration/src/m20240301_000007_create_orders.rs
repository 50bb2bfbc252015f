use sea_orm_migration::{prelude::*, schema::*};

use super::m20240301_000005_create_journeys::Journey;
use super::m20240301_000006_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(pk_auto(Order::Id))
                    .col(uuid(Order::UserId).not_null())
                    .col(
                        timestamp_with_time_zone(Order::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_user")
                            .from(Order::Table, Order::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ticket::Table)
                    .if_not_exists()
                    .col(pk_auto(Ticket::Id))
                    .col(integer(Ticket::JourneyId).not_null())
                    .col(integer(Ticket::OrderId).not_null())
                    .col(small_integer(Ticket::Carriage).not_null())
                    .col(small_integer(Ticket::Seat).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_journey")
                            .from(Ticket::Table, Ticket::JourneyId)
                            .to(Journey::Table, Journey::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_order")
                            .from(Ticket::Table, Ticket::OrderId)
                            .to(Order::Table, Order::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One physical seat per journey
        manager
            .create_index(
                Index::create()
                    .name("uq_ticket_journey_carriage_seat")
                    .table(Ticket::Table)
                    .col(Ticket::JourneyId)
                    .col(Ticket::Carriage)
                    .col(Ticket::Seat)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ticket::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Order::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Order {
    Table,
    Id,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Ticket {
    Table,
    Id,
    JourneyId,
    OrderId,
    Carriage,
    Seat,
}
