use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::entities::crew;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::repository::crew::{self as crews, NewCrew};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CrewResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

#[derive(Debug, Serialize)]
pub struct CrewListItem {
    pub id: i32,
    pub full_name: String,
}

#[derive(Debug, Serialize)]
pub struct CrewDetail {
    #[serde(flatten)]
    pub crew: CrewResponse,
    pub journeys: Vec<String>,
}

impl From<crew::Model> for CrewResponse {
    fn from(c: crew::Model) -> Self {
        Self {
            full_name: c.full_name(),
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
        }
    }
}

/// List crew members
pub async fn list_crew(State(state): State<AppState>) -> AppResult<Json<Vec<CrewListItem>>> {
    let crew = crews::list(&state.db).await?;

    Ok(Json(
        crew.into_iter()
            .map(|c| CrewListItem {
                full_name: c.full_name(),
                id: c.id,
            })
            .collect(),
    ))
}

/// Crew member with the journeys they work on
pub async fn get_crew(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CrewDetail>> {
    let found = crews::get(&state.db, id).await?;

    Ok(Json(CrewDetail {
        journeys: found.journeys.iter().map(|j| j.label()).collect(),
        crew: found.crew.into(),
    }))
}

/// Create a crew member (staff)
pub async fn create_crew(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewCrew>,
) -> AppResult<(StatusCode, Json<CrewResponse>)> {
    let crew = crews::create(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(crew.into())))
}
