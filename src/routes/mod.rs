use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, crew, journeys, orders, routes, stations, trains};
use crate::middleware::auth::{auth_middleware, require_staff_for_writes};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Public routes
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Catalogue: authenticated reads, staff-only writes
    let catalogue_routes = Router::new()
        .route(
            "/stations",
            get(stations::list_stations).post(stations::create_station),
        )
        .route("/routes", get(routes::list_routes).post(routes::create_route))
        .route("/routes/{id}", get(routes::get_route))
        .route(
            "/train_types",
            get(trains::list_train_types).post(trains::create_train_type),
        )
        .route("/trains", get(trains::list_trains).post(trains::create_train))
        .route("/crew", get(crew::list_crew).post(crew::create_crew))
        .route("/crew/{id}", get(crew::get_crew))
        .route(
            "/journeys",
            get(journeys::list_journeys).post(journeys::create_journey),
        )
        .route("/journeys/{id}", get(journeys::get_journey))
        .layer(middleware::from_fn(require_staff_for_writes))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Orders: any authenticated user, scoped to themselves
    let order_routes = Router::new()
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route("/orders/{id}", get(orders::get_order))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", catalogue_routes.merge(order_routes))
        .with_state(state)
}
