use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::repository::order::{self as orders, OrderWithTickets, TicketRequest};
use crate::utils::jwt::Claims;
use crate::utils::pagination::{Page, PageParams};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub tickets: Vec<TicketRequest>,
}

#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub id: i32,
    pub carriage: i16,
    pub seat: i16,
    pub journey: i32,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i32,
    pub tickets: Vec<TicketResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<OrderWithTickets> for OrderResponse {
    fn from(o: OrderWithTickets) -> Self {
        Self {
            id: o.order.id,
            tickets: o
                .tickets
                .into_iter()
                .map(|t| TicketResponse {
                    id: t.id,
                    carriage: t.carriage,
                    seat: t.seat,
                    journey: t.journey_id,
                })
                .collect(),
            created_at: o.order.created_at.with_timezone(&Utc),
        }
    }
}

/// Book tickets as one order
pub async fn create_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    let order = orders::create_order(&state.db, claims.sub, &payload.tickets).await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// List the caller's orders, paginated
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Page<OrderResponse>>> {
    let page = params.page()?;
    let page_size = params.page_size();

    let (orders, count) = orders::list_for_user(&state.db, claims.sub, page, page_size).await?;
    let results = orders.into_iter().map(OrderResponse::from).collect();

    Ok(Json(Page::new(results, count, page, page_size)))
}

/// Get one of the caller's orders
pub async fn get_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AppResult<Json<OrderResponse>> {
    Ok(Json(orders::get_for_user(&state.db, claims.sub, id).await?.into()))
}
