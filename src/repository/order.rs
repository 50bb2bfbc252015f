use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::{journey, order, ticket, train};
use crate::error::{AppError, AppResult};
use crate::utils::validation::{validate_ticket, ValidationError, NON_FIELD_ERRORS};

const SEAT_TAKEN: &str = "The fields journey, carriage, seat must make a unique set.";

/// One seat requested as part of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct TicketRequest {
    pub journey: i32,
    pub carriage: i32,
    pub seat: i32,
}

#[derive(Debug, Clone)]
pub struct OrderWithTickets {
    pub order: order::Model,
    pub tickets: Vec<ticket::Model>,
}

/// Creates an order and one ticket per request as a single transaction.
///
/// Every request is checked against its journey's train before anything is
/// written. Seat collisions, whether with an earlier order or a concurrent
/// one, are caught by the unique index and roll the whole order back.
pub async fn create_order(
    db: &DatabaseConnection,
    user_id: Uuid,
    requests: &[TicketRequest],
) -> AppResult<OrderWithTickets> {
    if requests.is_empty() {
        return Err(ValidationError::new("tickets", "This list may not be empty.").into());
    }

    let trains = trains_for_journeys(db, requests.iter().map(|r| r.journey)).await?;
    let mut requested = HashSet::with_capacity(requests.len());
    for request in requests {
        let train = trains
            .get(&request.journey)
            .ok_or_else(|| ValidationError::missing_object("journey", request.journey))?;
        validate_ticket(request.carriage, request.seat, train)?;
        if !requested.insert(*request) {
            return Err(ValidationError::new(NON_FIELD_ERRORS, SEAT_TAKEN).into());
        }
    }

    let txn = db.begin().await?;

    let order = order::ActiveModel {
        user_id: Set(user_id),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut tickets = Vec::with_capacity(requests.len());
    for request in requests {
        tickets.push(insert_ticket(&txn, order.id, request).await?);
    }

    txn.commit().await?;

    tracing::info!(
        order_id = order.id,
        user_id = %user_id,
        tickets = tickets.len(),
        "Order created"
    );

    Ok(OrderWithTickets { order, tickets })
}

/// Persists a single ticket, re-checking the seat against the journey's train.
/// A seat that is already booked comes back as a validation error.
pub async fn insert_ticket<C: ConnectionTrait>(
    db: &C,
    order_id: i32,
    request: &TicketRequest,
) -> AppResult<ticket::Model> {
    let train = journey::Entity::find_by_id(request.journey)
        .find_also_related(train::Entity)
        .one(db)
        .await?
        .and_then(|(_, train)| train)
        .ok_or_else(|| ValidationError::missing_object("journey", request.journey))?;
    validate_ticket(request.carriage, request.seat, &train)?;

    // Bounds were checked against small-int train dimensions above
    let carriage = i16::try_from(request.carriage)
        .map_err(|e| AppError::Internal(format!("Carriage out of range: {}", e)))?;
    let seat = i16::try_from(request.seat)
        .map_err(|e| AppError::Internal(format!("Seat out of range: {}", e)))?;

    // The (journey, carriage, seat) unique index is the only seat-taken check
    ticket::ActiveModel {
        journey_id: Set(request.journey),
        order_id: Set(order_id),
        carriage: Set(carriage),
        seat: Set(seat),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::warn!(
                journey_id = request.journey,
                carriage,
                seat,
                "Seat already taken"
            );
            AppError::from(ValidationError::new(NON_FIELD_ERRORS, SEAT_TAKEN))
        }
        _ => AppError::from(err),
    })
}

/// The caller's orders, newest first, with the total number of orders.
pub async fn list_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    page: u64,
    page_size: u64,
) -> AppResult<(Vec<OrderWithTickets>, u64)> {
    let paginator = order::Entity::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .paginate(db, page_size);

    let count = paginator.num_items().await?;
    if page > 1 && page > count.div_ceil(page_size) {
        return Err(AppError::NotFound("Invalid page.".to_string()));
    }

    let orders = paginator.fetch_page(page - 1).await?;
    Ok((with_tickets(db, orders).await?, count))
}

/// One of the caller's orders. Orders owned by someone else are refused
/// without saying whether they exist.
pub async fn get_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    order_id: i32,
) -> AppResult<OrderWithTickets> {
    let order = order::Entity::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if order.user_id != user_id {
        return Err(AppError::Forbidden(
            "You do not have permission to perform this action.".to_string(),
        ));
    }

    with_tickets(db, vec![order])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("Order vanished while loading tickets".to_string()))
}

async fn with_tickets<C: ConnectionTrait>(
    db: &C,
    orders: Vec<order::Model>,
) -> AppResult<Vec<OrderWithTickets>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let mut tickets: HashMap<i32, Vec<ticket::Model>> = HashMap::new();
    for t in ticket::Entity::find()
        .filter(ticket::Column::OrderId.is_in(orders.iter().map(|o| o.id)))
        .order_by_asc(ticket::Column::Id)
        .all(db)
        .await?
    {
        tickets.entry(t.order_id).or_default().push(t);
    }

    Ok(orders
        .into_iter()
        .map(|order| OrderWithTickets {
            tickets: tickets.remove(&order.id).unwrap_or_default(),
            order,
        })
        .collect())
}

async fn trains_for_journeys<C: ConnectionTrait>(
    db: &C,
    journey_ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, train::Model>, DbErr> {
    let ids: BTreeSet<i32> = journey_ids.into_iter().collect();

    Ok(journey::Entity::find()
        .filter(journey::Column::Id.is_in(ids))
        .find_also_related(train::Entity)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(journey, train)| train.map(|t| (journey.id, t)))
        .collect())
}
