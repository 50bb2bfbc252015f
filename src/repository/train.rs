use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;

use crate::entities::{train, train_type};
use crate::error::AppResult;
use crate::utils::validation::{validate_train, ValidationError};

#[derive(Debug, Clone, Deserialize)]
pub struct NewTrainType {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTrain {
    pub name: String,
    pub carriage_num: i32,
    pub places_in_carriage: i32,
    #[serde(default)]
    pub train_type: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct TrainWithType {
    pub train: train::Model,
    pub train_type: Option<train_type::Model>,
}

pub async fn create_train_type<C: ConnectionTrait>(
    db: &C,
    new: NewTrainType,
) -> AppResult<train_type::Model> {
    if new.name.trim().is_empty() {
        return Err(ValidationError::new("name", "This field may not be blank.").into());
    }

    let train_type = train_type::ActiveModel {
        name: Set(new.name),
        ..Default::default()
    };

    Ok(train_type.insert(db).await?)
}

pub async fn list_train_types<C: ConnectionTrait>(db: &C) -> AppResult<Vec<train_type::Model>> {
    Ok(train_type::Entity::find()
        .order_by_asc(train_type::Column::Id)
        .all(db)
        .await?)
}

pub async fn create_train<C: ConnectionTrait>(db: &C, new: NewTrain) -> AppResult<TrainWithType> {
    if new.name.trim().is_empty() {
        return Err(ValidationError::new("name", "This field may not be blank.").into());
    }
    let (carriage_num, places_in_carriage) =
        validate_train(new.carriage_num, new.places_in_carriage)?;

    let train_type = match new.train_type {
        Some(id) => Some(
            train_type::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| ValidationError::missing_object("train_type", id))?,
        ),
        None => None,
    };

    let train = train::ActiveModel {
        name: Set(new.name),
        carriage_num: Set(carriage_num),
        places_in_carriage: Set(places_in_carriage),
        train_type_id: Set(train_type.as_ref().map(|t| t.id)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(TrainWithType { train, train_type })
}

pub async fn list_trains<C: ConnectionTrait>(db: &C) -> AppResult<Vec<TrainWithType>> {
    let rows = train::Entity::find()
        .find_also_related(train_type::Entity)
        .order_by_asc(train::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(train, train_type)| TrainWithType { train, train_type })
        .collect())
}
