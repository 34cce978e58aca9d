use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users;
mod m20250601_000002_create_games;
mod m20250601_000003_create_ratings;
mod m20250601_000004_create_backlog_items;
mod m20250601_000005_create_recommendations;
mod m20250601_000006_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users::Migration),
            Box::new(m20250601_000002_create_games::Migration),
            Box::new(m20250601_000003_create_ratings::Migration),
            Box::new(m20250601_000004_create_backlog_items::Migration),
            Box::new(m20250601_000005_create_recommendations::Migration),
            Box::new(m20250601_000006_add_indexes::Migration),
        ]
    }
}
