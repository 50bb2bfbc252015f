use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::entities::station;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::repository::route::{self as routes, NewRoute, RouteWithStations};
use crate::AppState;

/// Shape returned after a write: endpoints as ids.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub id: i32,
    pub source: Option<i32>,
    pub destination: Option<i32>,
    pub distance: i16,
}

#[derive(Debug, Serialize)]
pub struct RouteListItem {
    pub id: i32,
    pub source: String,
    pub destination: String,
    pub distance: i16,
}

#[derive(Debug, Serialize)]
pub struct RouteDetail {
    pub id: i32,
    pub source: Option<station::Model>,
    pub destination: Option<station::Model>,
    pub distance: i16,
}

impl From<&RouteWithStations> for RouteListItem {
    fn from(r: &RouteWithStations) -> Self {
        Self {
            id: r.route.id,
            source: r.source_name().to_string(),
            destination: r.destination_name().to_string(),
            distance: r.route.distance,
        }
    }
}

impl From<RouteWithStations> for RouteDetail {
    fn from(r: RouteWithStations) -> Self {
        Self {
            id: r.route.id,
            source: r.source,
            destination: r.destination,
            distance: r.route.distance,
        }
    }
}

/// List all routes
pub async fn list_routes(State(state): State<AppState>) -> AppResult<Json<Vec<RouteListItem>>> {
    let routes = routes::list(&state.db).await?;
    Ok(Json(routes.iter().map(RouteListItem::from).collect()))
}

/// Get route details
pub async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<RouteDetail>> {
    Ok(Json(routes::get(&state.db, id).await?.into()))
}

/// Create a route (staff)
pub async fn create_route(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewRoute>,
) -> AppResult<(StatusCode, Json<RouteResponse>)> {
    let created = routes::create(&state.db, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(RouteResponse {
            id: created.route.id,
            source: created.route.source_id,
            destination: created.route.destination_id,
            distance: created.route.distance,
        }),
    ))
}
