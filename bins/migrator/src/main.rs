//! Schema migrations for the Tally database.
//!
//! Reads `DATABASE_URL` and accepts the standard commands:
//!   migrator up       apply pending migrations
//!   migrator down     revert the latest migration
//!   migrator status   list applied and pending migrations
//!   migrator fresh    drop everything and migrate from scratch

use sea_orm_migration::prelude::*;
use tally_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
