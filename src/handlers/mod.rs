pub mod auth;
pub mod crew;
pub mod journeys;
pub mod orders;
pub mod routes;
pub mod stations;
pub mod trains;
