use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::station;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::handlers::crew::CrewResponse;
use crate::handlers::trains::TrainResponse;
use crate::repository::journey::{self as journeys, JourneyDetails, JourneyFilter, NewJourney};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct JourneyResponse {
    pub id: i32,
    pub route: i32,
    pub train: i32,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub crew: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct JourneyListItem {
    pub id: i32,
    pub route: String,
    pub train: String,
    pub tickets_available: i64,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub crew: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JourneyDetail {
    pub id: i32,
    pub source: Option<station::Model>,
    pub destination: Option<station::Model>,
    pub distance: i16,
    pub train: TrainResponse,
    pub tickets_available: i64,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub crew: Vec<CrewResponse>,
}

impl From<&JourneyDetails> for JourneyListItem {
    fn from(j: &JourneyDetails) -> Self {
        Self {
            id: j.journey.id,
            route: j.route.label(),
            train: j.train.train.name.clone(),
            tickets_available: j.tickets_available,
            departure_time: j.journey.departure_time.with_timezone(&Utc),
            arrival_time: j.journey.arrival_time.with_timezone(&Utc),
            crew: j.crew.iter().map(|c| c.full_name()).collect(),
        }
    }
}

impl From<JourneyDetails> for JourneyDetail {
    fn from(j: JourneyDetails) -> Self {
        Self {
            id: j.journey.id,
            source: j.route.source,
            destination: j.route.destination,
            distance: j.route.route.distance,
            train: j.train.into(),
            tickets_available: j.tickets_available,
            departure_time: j.journey.departure_time.with_timezone(&Utc),
            arrival_time: j.journey.arrival_time.with_timezone(&Utc),
            crew: j.crew.into_iter().map(CrewResponse::from).collect(),
        }
    }
}

/// List journeys, optionally filtered by `train_name` and `station`
pub async fn list_journeys(
    State(state): State<AppState>,
    Query(filter): Query<JourneyFilter>,
) -> AppResult<Json<Vec<JourneyListItem>>> {
    let journeys = journeys::list(&state.db, &filter).await?;
    Ok(Json(journeys.iter().map(JourneyListItem::from).collect()))
}

/// Get journey details
pub async fn get_journey(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<JourneyDetail>> {
    Ok(Json(journeys::get(&state.db, id).await?.into()))
}

/// Schedule a journey (staff)
pub async fn create_journey(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewJourney>,
) -> AppResult<(StatusCode, Json<JourneyResponse>)> {
    let created = journeys::create(&state.db, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(JourneyResponse {
            id: created.journey.id,
            route: created.journey.route_id,
            train: created.journey.train_id,
            departure_time: created.journey.departure_time.with_timezone(&Utc),
            arrival_time: created.journey.arrival_time.with_timezone(&Utc),
            crew: created.crew.iter().map(|c| c.id).collect(),
        }),
    ))
}
