//! Schema management for the school directory store, e.g.
//! `DATABASE_URL=sqlite://dev_assets/db.sqlite?mode=rwc cargo run -p db-migration -- status`.
use db_migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
