use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::entities::train_type;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::repository::train::{self as trains, NewTrain, NewTrainType, TrainWithType};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub id: i32,
    pub name: String,
    pub train_type: Option<String>,
    pub carriage_num: i16,
    pub places_in_carriage: i16,
    pub capacity: i32,
}

impl From<TrainWithType> for TrainResponse {
    fn from(t: TrainWithType) -> Self {
        Self {
            capacity: t.train.capacity(),
            id: t.train.id,
            name: t.train.name,
            train_type: t.train_type.map(|tt| tt.name),
            carriage_num: t.train.carriage_num,
            places_in_carriage: t.train.places_in_carriage,
        }
    }
}

/// List all train types
pub async fn list_train_types(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<train_type::Model>>> {
    Ok(Json(trains::list_train_types(&state.db).await?))
}

/// Create a train type (staff)
pub async fn create_train_type(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewTrainType>,
) -> AppResult<(StatusCode, Json<train_type::Model>)> {
    let train_type = trains::create_train_type(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(train_type)))
}

/// List all trains
pub async fn list_trains(State(state): State<AppState>) -> AppResult<Json<Vec<TrainResponse>>> {
    let trains = trains::list_trains(&state.db).await?;
    Ok(Json(trains.into_iter().map(TrainResponse::from).collect()))
}

/// Create a train (staff)
pub async fn create_train(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewTrain>,
) -> AppResult<(StatusCode, Json<TrainResponse>)> {
    let train = trains::create_train(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(train.into())))
}
