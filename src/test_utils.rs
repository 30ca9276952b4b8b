//! Shared test utilities for `Splitzy`.
//!
//! This module provides helpers for setting up test databases, seeding trips
//! with sensible defaults, and building plain rows for calculator tests.

use crate::{
    config::settings::TripDefaults,
    core::{
        currency::NewCurrency,
        expense::{self, NewExpense},
        member::NewMember,
        settlement::ExpenseRecord,
        trip::{self, NewTrip},
    },
    entities,
    errors::Result,
};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness, once per process.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A fixed calendar date for deterministic trips.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// A fixed timestamp `days` after the epoch, for ordering expenses.
pub fn day(days: i64) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(days)
}

/// Builds a trip description with the given members (weight 1) and currencies.
pub fn new_trip(name: &str, members: &[&str], currencies: &[&str]) -> NewTrip {
    NewTrip {
        name: name.to_string(),
        location: "Somewhere".to_string(),
        start_date: date(2026, 3, 1),
        end_date: date(2026, 3, 10),
        members: members
            .iter()
            .map(|name| NewMember {
                name: (*name).to_string(),
                weight: Some(1.0),
            })
            .collect(),
        currencies: currencies
            .iter()
            .map(|abbreviation| NewCurrency {
                name: format!("{abbreviation} currency"),
                abbreviation: (*abbreviation).to_string(),
            })
            .collect(),
    }
}

/// A seeded trip and its roster, in insertion order.
pub struct TestTrip {
    pub trip: entities::trip::Model,
    pub members: Vec<entities::member::Model>,
    pub currencies: Vec<entities::currency::Model>,
}

/// Creates a trip with members "Alice" and "Bob" and currencies "SGD" and "JPY".
pub async fn setup_with_trip() -> Result<(DatabaseConnection, TestTrip)> {
    let db = setup_test_db().await?;
    let seeded = create_test_trip(&db, new_trip("Test Trip", &["Alice", "Bob"], &["SGD", "JPY"]))
        .await?;
    Ok((db, seeded))
}

/// Creates a trip and reloads its roster.
pub async fn create_test_trip(db: &DatabaseConnection, new: NewTrip) -> Result<TestTrip> {
    let trip = trip::create_trip(db, new, &TripDefaults::default()).await?;
    let members = crate::core::member::get_members_for_trip(db, trip.id).await?;
    let currencies = crate::core::currency::get_currencies_for_trip(db, trip.id).await?;
    Ok(TestTrip {
        trip,
        members,
        currencies,
    })
}

/// Logs an expense split evenly between all of the trip's members.
pub async fn create_even_expense(
    db: &DatabaseConnection,
    seeded: &TestTrip,
    payer_index: usize,
    amount: f64,
    currency_index: usize,
) -> Result<entities::expense::Model> {
    let shares = seeded.members.iter().map(|m| (m.id, 1.0)).collect();
    expense::create_expense(
        db,
        NewExpense {
            trip_id: seeded.trip.id,
            name: "Test expense".to_string(),
            payer_id: seeded.members[payer_index].id,
            amount,
            currency_id: seeded.currencies[currency_index].id,
            date: day(1),
            shares,
        },
    )
    .await
}

pub fn sample_member(id: i64, name: &str) -> entities::member::Model {
    entities::member::Model {
        id,
        name: name.to_string(),
        weight: 1.0,
        trip_id: 1,
    }
}

pub fn sample_currency(id: i64, abbreviation: &str) -> entities::currency::Model {
    entities::currency::Model {
        id,
        name: format!("{abbreviation} currency"),
        abbreviation: abbreviation.to_string(),
        trip_id: 1,
    }
}

pub fn sample_expense(
    id: i64,
    payer_id: i64,
    amount: f64,
    currency_id: i64,
    is_resolved: bool,
    shares: &[(i64, f64)],
) -> ExpenseRecord {
    ExpenseRecord {
        expense: entities::expense::Model {
            id,
            trip_id: 1,
            name: format!("Expense {id}"),
            payer_id,
            amount,
            currency_id,
            date: day(id),
            is_resolved,
        },
        shares: shares.iter().copied().collect::<HashMap<_, _>>(),
    }
}

pub fn sample_transaction(
    id: i64,
    payer_id: i64,
    recipient_id: i64,
    amount: f64,
    currency_id: i64,
) -> entities::transaction::Model {
    entities::transaction::Model {
        id,
        trip_id: 1,
        payer_id,
        recipient_id,
        amount,
        currency_id,
        date: day(id),
    }
}
