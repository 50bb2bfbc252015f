use std::collections::HashMap;

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;

use crate::entities::{route, station};
use crate::error::{AppError, AppResult};
use crate::utils::validation::{validate_route, validate_route_distance, ValidationError};

#[derive(Debug, Clone, Deserialize)]
pub struct NewRoute {
    pub source: i32,
    pub destination: i32,
    pub distance: i32,
}

/// A route with its endpoints resolved. Endpoints are `None` once the
/// station has been deleted.
#[derive(Debug, Clone)]
pub struct RouteWithStations {
    pub route: route::Model,
    pub source: Option<station::Model>,
    pub destination: Option<station::Model>,
}

impl RouteWithStations {
    pub fn source_name(&self) -> &str {
        self.source.as_ref().map_or("unknown", |s| s.name.as_str())
    }

    pub fn destination_name(&self) -> &str {
        self.destination.as_ref().map_or("unknown", |s| s.name.as_str())
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.source_name(), self.destination_name())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewRoute) -> AppResult<RouteWithStations> {
    validate_route(new.source, new.destination)?;
    let distance = validate_route_distance(new.distance)?;

    let source = station::Entity::find_by_id(new.source)
        .one(db)
        .await?
        .ok_or_else(|| ValidationError::missing_object("source", new.source))?;
    let destination = station::Entity::find_by_id(new.destination)
        .one(db)
        .await?
        .ok_or_else(|| ValidationError::missing_object("destination", new.destination))?;

    let route = route::ActiveModel {
        source_id: Set(Some(source.id)),
        destination_id: Set(Some(destination.id)),
        distance: Set(distance),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(RouteWithStations {
        route,
        source: Some(source),
        destination: Some(destination),
    })
}

pub async fn list<C: ConnectionTrait>(db: &C) -> AppResult<Vec<RouteWithStations>> {
    let routes = route::Entity::find()
        .order_by_asc(route::Column::Id)
        .all(db)
        .await?;
    with_stations(db, routes).await
}

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<RouteWithStations> {
    let route = route::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Route not found".to_string()))?;

    with_stations(db, vec![route])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("Route vanished while loading stations".to_string()))
}

/// Resolves both endpoints for a batch of routes with a single station query.
pub async fn with_stations<C: ConnectionTrait>(
    db: &C,
    routes: Vec<route::Model>,
) -> AppResult<Vec<RouteWithStations>> {
    let station_ids: Vec<i32> = routes
        .iter()
        .flat_map(|r| [r.source_id, r.destination_id])
        .flatten()
        .collect();

    let stations: HashMap<i32, station::Model> = if station_ids.is_empty() {
        HashMap::new()
    } else {
        station::Entity::find()
            .filter(station::Column::Id.is_in(station_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect()
    };

    Ok(routes
        .into_iter()
        .map(|route| RouteWithStations {
            source: route.source_id.and_then(|id| stations.get(&id).cloned()),
            destination: route.destination_id.and_then(|id| stations.get(&id).cloned()),
            route,
        })
        .collect())
}
