use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TrainType::Table)
                    .if_not_exists()
                    .col(pk_auto(TrainType::Id))
                    .col(string_len(TrainType::Name, 255).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Train::Table)
                    .if_not_exists()
                    .col(pk_auto(Train::Id))
                    .col(string_len(Train::Name, 255).not_null())
                    .col(small_integer(Train::CarriageNum).not_null())
                    .col(small_integer(Train::PlacesInCarriage).not_null())
                    .col(integer_null(Train::TrainTypeId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_train_train_type")
                            .from(Train::Table, Train::TrainTypeId)
                            .to(TrainType::Table, TrainType::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Train::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TrainType::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TrainType {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum Train {
    Table,
    Id,
    Name,
    CarriageNum,
    PlacesInCarriage,
    TrainTypeId,
}
