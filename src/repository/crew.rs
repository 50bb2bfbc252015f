use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryOrder, Set};
use serde::Deserialize;

use crate::entities::{crew, journey};
use crate::error::{AppError, AppResult};
use crate::repository::journey::{hydrate, JourneyDetails};
use crate::utils::validation::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewCrew {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone)]
pub struct CrewWithJourneys {
    pub crew: crew::Model,
    pub journeys: Vec<JourneyDetails>,
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewCrew) -> AppResult<crew::Model> {
    for (value, field) in [(&new.first_name, "first_name"), (&new.last_name, "last_name")] {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, "This field may not be blank.").into());
        }
    }

    let crew = crew::ActiveModel {
        first_name: Set(new.first_name),
        last_name: Set(new.last_name),
        ..Default::default()
    };

    Ok(crew.insert(db).await?)
}

pub async fn list<C: ConnectionTrait>(db: &C) -> AppResult<Vec<crew::Model>> {
    Ok(crew::Entity::find()
        .order_by_asc(crew::Column::Id)
        .all(db)
        .await?)
}

/// A crew member together with the journeys they are assigned to.
pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<CrewWithJourneys> {
    let crew = crew::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Crew member not found".to_string()))?;

    let journeys = crew
        .find_related(journey::Entity)
        .order_by_desc(journey::Column::DepartureTime)
        .all(db)
        .await?;

    Ok(CrewWithJourneys {
        journeys: hydrate(db, journeys).await?,
        crew,
    })
}
