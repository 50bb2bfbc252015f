use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Condition, Expr, Func, LikeExpr, Query, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;

use crate::entities::{crew, journey, journey_crew, route, station, ticket, train, train_type};
use crate::error::{AppError, AppResult};
use crate::repository::route::{with_stations, RouteWithStations};
use crate::repository::train::TrainWithType;
use crate::utils::availability::tickets_available;
use crate::utils::validation::{validate_journey_times, ValidationError};

#[derive(Debug, Clone, Deserialize)]
pub struct NewJourney {
    pub route: i32,
    pub train: i32,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    #[serde(default)]
    pub crew: Vec<i32>,
}

/// Optional `?train_name=&station=` filters for the journey listing.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct JourneyFilter {
    pub train_name: Option<String>,
    pub station: Option<String>,
}

/// A journey with everything its list and detail views show.
#[derive(Debug, Clone)]
pub struct JourneyDetails {
    pub journey: journey::Model,
    pub route: RouteWithStations,
    pub train: TrainWithType,
    pub crew: Vec<crew::Model>,
    pub tickets_available: i64,
}

impl JourneyDetails {
    pub fn label(&self) -> String {
        format!(
            "{} at {}",
            self.route.label(),
            self.journey.departure_time.format("%Y-%m-%d %H:%M:%S%:z")
        )
    }
}

pub async fn create(db: &DatabaseConnection, new: NewJourney) -> AppResult<JourneyDetails> {
    validate_journey_times(new.departure_time, new.arrival_time)?;

    let txn = db.begin().await?;

    route::Entity::find_by_id(new.route)
        .one(&txn)
        .await?
        .ok_or_else(|| ValidationError::missing_object("route", new.route))?;
    train::Entity::find_by_id(new.train)
        .one(&txn)
        .await?
        .ok_or_else(|| ValidationError::missing_object("train", new.train))?;

    let crew_ids: BTreeSet<i32> = new.crew.iter().copied().collect();
    if !crew_ids.is_empty() {
        let found: BTreeSet<i32> = crew::Entity::find()
            .filter(crew::Column::Id.is_in(crew_ids.iter().copied()))
            .all(&txn)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        if let Some(missing) = crew_ids.difference(&found).next() {
            return Err(ValidationError::missing_object("crew", *missing).into());
        }
    }

    let journey = journey::ActiveModel {
        route_id: Set(new.route),
        train_id: Set(new.train),
        departure_time: Set(new.departure_time.into()),
        arrival_time: Set(new.arrival_time.into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if !crew_ids.is_empty() {
        journey_crew::Entity::insert_many(crew_ids.iter().map(|crew_id| {
            journey_crew::ActiveModel {
                journey_id: Set(journey.id),
                crew_id: Set(*crew_id),
            }
        }))
        .exec_without_returning(&txn)
        .await?;
    }

    let details = hydrate(&txn, vec![journey])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("Created journey could not be loaded".to_string()))?;

    txn.commit().await?;

    tracing::info!(journey_id = details.journey.id, "Journey created");
    Ok(details)
}

/// Lists journeys, most recent departure first.
///
/// Filters are `IN (subquery)` predicates rather than joins, so a journey
/// matching through both route endpoints is returned once.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    filter: &JourneyFilter,
) -> AppResult<Vec<JourneyDetails>> {
    let mut query = journey::Entity::find();

    if let Some(train_name) = non_blank(filter.train_name.as_deref()) {
        let trains = Query::select()
            .column(train::Column::Id)
            .from(train::Entity)
            .and_where(contains_ignore_case(train::Column::Name, train_name))
            .to_owned();
        query = query.filter(journey::Column::TrainId.in_subquery(trains));
    }

    if let Some(station_name) = non_blank(filter.station.as_deref()) {
        let stations = Query::select()
            .column(station::Column::Id)
            .from(station::Entity)
            .and_where(contains_ignore_case(station::Column::Name, station_name))
            .to_owned();
        let routes = Query::select()
            .column(route::Column::Id)
            .from(route::Entity)
            .cond_where(
                Condition::any()
                    .add(route::Column::SourceId.in_subquery(stations.clone()))
                    .add(route::Column::DestinationId.in_subquery(stations)),
            )
            .to_owned();
        query = query.filter(journey::Column::RouteId.in_subquery(routes));
    }

    let journeys = query
        .order_by_desc(journey::Column::DepartureTime)
        .order_by_desc(journey::Column::Id)
        .all(db)
        .await?;

    hydrate(db, journeys).await
}

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<JourneyDetails> {
    let journey = journey::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Journey not found".to_string()))?;

    hydrate(db, vec![journey])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("Journey vanished while loading".to_string()))
}

/// Number of tickets booked per journey, counted by the store at call time.
/// Journeys without tickets are absent from the map.
pub async fn booked_counts<C: ConnectionTrait>(
    db: &C,
    journey_ids: &[i32],
) -> AppResult<HashMap<i32, i64>> {
    if journey_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, i64)> = ticket::Entity::find()
        .select_only()
        .column(ticket::Column::JourneyId)
        .column_as(ticket::Column::Id.count(), "booked")
        .filter(ticket::Column::JourneyId.is_in(journey_ids.iter().copied()))
        .group_by(ticket::Column::JourneyId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows.into_iter().collect())
}

/// Loads routes, trains, crew and booked counts for a batch of journeys,
/// preserving the input order.
pub async fn hydrate<C: ConnectionTrait>(
    db: &C,
    journeys: Vec<journey::Model>,
) -> AppResult<Vec<JourneyDetails>> {
    if journeys.is_empty() {
        return Ok(Vec::new());
    }

    let journey_ids: Vec<i32> = journeys.iter().map(|j| j.id).collect();
    let route_ids: BTreeSet<i32> = journeys.iter().map(|j| j.route_id).collect();
    let train_ids: BTreeSet<i32> = journeys.iter().map(|j| j.train_id).collect();

    let routes = route::Entity::find()
        .filter(route::Column::Id.is_in(route_ids))
        .all(db)
        .await?;
    let routes: HashMap<i32, RouteWithStations> = with_stations(db, routes)
        .await?
        .into_iter()
        .map(|r| (r.route.id, r))
        .collect();

    let trains: HashMap<i32, TrainWithType> = train::Entity::find()
        .filter(train::Column::Id.is_in(train_ids))
        .find_also_related(train_type::Entity)
        .all(db)
        .await?
        .into_iter()
        .map(|(train, train_type)| (train.id, TrainWithType { train, train_type }))
        .collect();

    let links = journey_crew::Entity::find()
        .filter(journey_crew::Column::JourneyId.is_in(journey_ids.iter().copied()))
        .all(db)
        .await?;
    let crew_ids: BTreeSet<i32> = links.iter().map(|l| l.crew_id).collect();
    let crews: HashMap<i32, crew::Model> = if crew_ids.is_empty() {
        HashMap::new()
    } else {
        crew::Entity::find()
            .filter(crew::Column::Id.is_in(crew_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect()
    };

    let booked = booked_counts(db, &journey_ids).await?;

    journeys
        .into_iter()
        .map(|journey| {
            let route = routes.get(&journey.route_id).cloned().ok_or_else(|| {
                AppError::Internal(format!("Route {} missing for journey", journey.route_id))
            })?;
            let train = trains.get(&journey.train_id).cloned().ok_or_else(|| {
                AppError::Internal(format!("Train {} missing for journey", journey.train_id))
            })?;

            let mut crew: Vec<crew::Model> = links
                .iter()
                .filter(|link| link.journey_id == journey.id)
                .filter_map(|link| crews.get(&link.crew_id).cloned())
                .collect();
            crew.sort_by_key(|c| c.id);

            let tickets_available =
                tickets_available(&train.train, booked.get(&journey.id).copied().unwrap_or(0));

            Ok(JourneyDetails {
                journey,
                route,
                train,
                crew,
                tickets_available,
            })
        })
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Case-insensitive substring match with LIKE wildcards in `needle` escaped.
fn contains_ignore_case<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let escaped = needle
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(format!("%{}%", escaped)).escape('\\'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_ignored() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" Kyiv ")), Some("Kyiv"));
    }
}
