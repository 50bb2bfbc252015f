use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "train")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub carriage_num: i16,
    pub places_in_carriage: i16,
    pub train_type_id: Option<i32>,
}

impl Model {
    /// Total number of seats on the train.
    pub fn capacity(&self) -> i32 {
        i32::from(self.carriage_num) * i32::from(self.places_in_carriage)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::train_type::Entity",
        from = "Column::TrainTypeId",
        to = "super::train_type::Column::Id",
        on_delete = "SetNull"
    )]
    TrainType,
    #[sea_orm(has_many = "super::journey::Entity")]
    Journeys,
}

impl Related<super::train_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrainType.def()
    }
}

impl Related<super::journey::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Journeys.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
