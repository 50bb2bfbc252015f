use axum::{extract::State, http::StatusCode, Json};

use crate::entities::station;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::repository::station::{self as stations, NewStation};
use crate::AppState;

/// List all stations
pub async fn list_stations(State(state): State<AppState>) -> AppResult<Json<Vec<station::Model>>> {
    Ok(Json(stations::list(&state.db).await?))
}

/// Create a station (staff)
pub async fn create_station(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewStation>,
) -> AppResult<(StatusCode, Json<station::Model>)> {
    let station = stations::create(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(station)))
}
