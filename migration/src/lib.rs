pub use sea_orm_migration::prelude::*;

mod m20260110_000001_create_draws;
mod m20260118_000002_add_entries;
mod m20260206_000003_add_winners_publish;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260110_000001_create_draws::Migration),
            Box::new(m20260118_000002_add_entries::Migration),
            Box::new(m20260206_000003_add_winners_publish::Migration),
        ]
    }
}
