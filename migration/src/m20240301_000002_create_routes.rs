use sea_orm_migration::{prelude::*, schema::*};

use super::m20240301_000001_create_stations::Station;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Route::Table)
                    .if_not_exists()
                    .col(pk_auto(Route::Id))
                    .col(integer_null(Route::SourceId))
                    .col(integer_null(Route::DestinationId))
                    .col(small_integer(Route::Distance).not_null())
                    // Removing a station keeps the route around with a dangling endpoint
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_route_source_station")
                            .from(Route::Table, Route::SourceId)
                            .to(Station::Table, Station::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_route_destination_station")
                            .from(Route::Table, Route::DestinationId)
                            .to(Station::Table, Station::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Route::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Route {
    Table,
    Id,
    SourceId,
    DestinationId,
    Distance,
}
