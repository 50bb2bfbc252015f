use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;

use crate::entities::station;
use crate::error::AppResult;
use crate::utils::validation::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewStation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewStation) -> AppResult<station::Model> {
    if new.name.trim().is_empty() {
        return Err(ValidationError::new("name", "This field may not be blank.").into());
    }
    if !(-90.0..=90.0).contains(&new.latitude) {
        return Err(ValidationError::new("latitude", "Latitude must be between -90 and 90.").into());
    }
    if !(-180.0..=180.0).contains(&new.longitude) {
        return Err(
            ValidationError::new("longitude", "Longitude must be between -180 and 180.").into(),
        );
    }

    let station = station::ActiveModel {
        name: Set(new.name),
        latitude: Set(new.latitude),
        longitude: Set(new.longitude),
        ..Default::default()
    };

    Ok(station.insert(db).await?)
}

pub async fn list<C: ConnectionTrait>(db: &C) -> AppResult<Vec<station::Model>> {
    Ok(station::Entity::find()
        .order_by_asc(station::Column::Id)
        .all(db)
        .await?)
}
