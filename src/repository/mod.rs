//! Data access per entity. Every function accepts any SeaORM connection, so
//! callers can run them inside a transaction.

pub mod crew;
pub mod journey;
pub mod order;
pub mod route;
pub mod station;
pub mod train;
pub mod user;
