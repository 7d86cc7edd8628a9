//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_properties;
mod m20240301_000002_create_options;
mod m20240301_000003_create_option_property;
mod m20240301_000004_create_pictures;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_properties::Migration),
            Box::new(m20240301_000002_create_options::Migration),
            Box::new(m20240301_000003_create_option_property::Migration),
            Box::new(m20240301_000004_create_pictures::Migration),
        ]
    }
}
