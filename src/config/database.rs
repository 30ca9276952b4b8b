//! Database configuration module for `Splitzy`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Member shares live in their own
//! `expense_shares` table; no table is ever altered at runtime.

use crate::entities::{Currency, Expense, ExpenseShare, Member, Transaction, Trip};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

/// Fallback used when neither `DATABASE_URL` nor the config file name a database.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/splitzy.sqlite?mode=rwc";

/// Resolves the database URL, preferring the `DATABASE_URL` environment variable.
#[must_use]
pub fn get_database_url(configured: Option<&str>) -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        configured
            .unwrap_or(DEFAULT_DATABASE_URL)
            .to_string()
    })
}

/// Establishes a connection to the `SQLite` database at `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates one table from its entity definition unless it already exists.
async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// Parent tables are created before the tables that reference them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Trip).await?;
    create_table(db, &schema, Member).await?;
    create_table(db, &schema, Currency).await?;
    create_table(db, &schema, Expense).await?;
    create_table(db, &schema, ExpenseShare).await?;
    create_table(db, &schema, Transaction).await?;

    info!("Database tables ensured");
    Ok(())
}
