#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use train_station_backend::{
    config::Config,
    entities::{route, station, train, user},
    repository::{
        journey::{self as journeys, JourneyDetails, NewJourney},
        route::{self as routes, NewRoute},
        station::{self as stations, NewStation},
        train::{self as trains, NewTrain},
        user as users,
    },
    utils::jwt::create_token,
    AppState,
};

pub const JWT_SECRET: &str = "test-secret";

/// Fresh in-memory database with every migration applied. A single pooled
/// connection keeps the in-memory schema alive for the whole test.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.expect("connect to sqlite");
    migration::Migrator::up(&db, None)
        .await
        .expect("run migrations");
    db
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration_hours: 1,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        admin_email: None,
        admin_password: None,
    }
}

pub async fn test_state() -> AppState {
    AppState {
        db: setup_db().await,
        config: test_config(),
    }
}

pub fn departure(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, 8, 0, 0)
        .single()
        .expect("valid date")
}

pub async fn station(db: &DatabaseConnection, name: &str) -> station::Model {
    stations::create(
        db,
        NewStation {
            name: name.to_string(),
            latitude: 50.45,
            longitude: 30.52,
        },
    )
    .await
    .expect("create station")
}

pub async fn route_between(
    db: &DatabaseConnection,
    source: &station::Model,
    destination: &station::Model,
) -> route::Model {
    routes::create(
        db,
        NewRoute {
            source: source.id,
            destination: destination.id,
            distance: 480,
        },
    )
    .await
    .expect("create route")
    .route
}

pub async fn train_with(
    db: &DatabaseConnection,
    name: &str,
    carriage_num: i32,
    places_in_carriage: i32,
) -> train::Model {
    trains::create_train(
        db,
        NewTrain {
            name: name.to_string(),
            carriage_num,
            places_in_carriage,
            train_type: None,
        },
    )
    .await
    .expect("create train")
    .train
}

pub async fn journey_on(
    db: &DatabaseConnection,
    route: &route::Model,
    train: &train::Model,
    day: u32,
) -> JourneyDetails {
    let departure_time = departure(day);
    journeys::create(
        db,
        NewJourney {
            route: route.id,
            train: train.id,
            departure_time,
            arrival_time: departure_time + Duration::hours(6),
            crew: Vec::new(),
        },
    )
    .await
    .expect("create journey")
}

/// Kyiv -> Lviv on a 2 x 10 train.
pub async fn small_journey(db: &DatabaseConnection) -> JourneyDetails {
    let kyiv = station(db, "Kyiv").await;
    let lviv = station(db, "Lviv").await;
    let route = route_between(db, &kyiv, &lviv).await;
    let train = train_with(db, "Intercity 743", 2, 10).await;
    journey_on(db, &route, &train, 1).await
}

pub async fn user(db: &DatabaseConnection, email: &str, is_staff: bool) -> user::Model {
    users::create(db, email, "correct-horse", is_staff)
        .await
        .expect("create user")
}

pub fn token_for(user: &user::Model) -> String {
    create_token(user.id, &user.email, user.is_staff, JWT_SECRET, 1).expect("sign token")
}

pub fn random_email() -> String {
    format!("{}@example.com", Uuid::new_v4())
}
