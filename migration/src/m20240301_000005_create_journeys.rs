use sea_orm_migration::{prelude::*, schema::*};

use super::m20240301_000002_create_routes::Route;
use super::m20240301_000003_create_trains::Train;
use super::m20240301_000004_create_crew::Crew;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Journey::Table)
                    .if_not_exists()
                    .col(pk_auto(Journey::Id))
                    .col(integer(Journey::RouteId).not_null())
                    .col(integer(Journey::TrainId).not_null())
                    .col(timestamp_with_time_zone(Journey::DepartureTime).not_null())
                    .col(timestamp_with_time_zone(Journey::ArrivalTime).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journey_route")
                            .from(Journey::Table, Journey::RouteId)
                            .to(Route::Table, Route::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journey_train")
                            .from(Journey::Table, Journey::TrainId)
                            .to(Train::Table, Train::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journey_departure_time")
                    .table(Journey::Table)
                    .col(Journey::DepartureTime)
                    .to_owned(),
            )
            .await?;

        // Crew assignments
        manager
            .create_table(
                Table::create()
                    .table(JourneyCrew::Table)
                    .if_not_exists()
                    .col(integer(JourneyCrew::JourneyId).not_null())
                    .col(integer(JourneyCrew::CrewId).not_null())
                    .primary_key(
                        Index::create()
                            .col(JourneyCrew::JourneyId)
                            .col(JourneyCrew::CrewId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journey_crew_journey")
                            .from(JourneyCrew::Table, JourneyCrew::JourneyId)
                            .to(Journey::Table, Journey::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journey_crew_crew")
                            .from(JourneyCrew::Table, JourneyCrew::CrewId)
                            .to(Crew::Table, Crew::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JourneyCrew::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Journey::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Journey {
    Table,
    Id,
    RouteId,
    TrainId,
    DepartureTime,
    ArrivalTime,
}

#[derive(DeriveIden)]
pub enum JourneyCrew {
    Table,
    JourneyId,
    CrewId,
}
