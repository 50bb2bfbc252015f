pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_stations;
mod m20240301_000002_create_routes;
mod m20240301_000003_create_trains;
mod m20240301_000004_create_crew;
mod m20240301_000005_create_journeys;
mod m20240301_000006_create_users;
mod m20240301_000007_create_orders;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_stations::Migration),
            Box::new(m20240301_000002_create_routes::Migration),
            Box::new(m20240301_000003_create_trains::Migration),
            Box::new(m20240301_000004_create_crew::Migration),
            Box::new(m20240301_000005_create_journeys::Migration),
            Box::new(m20240301_000006_create_users::Migration),
            Box::new(m20240301_000007_create_orders::Migration),
        ]
    }
}
