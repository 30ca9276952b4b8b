//! Trip business logic - Handles creating, listing, searching and deleting trips.
//!
//! A trip owns its members, currencies, expenses and transactions. Creating a trip
//! inserts its initial roster in one database transaction, and deleting a trip
//! removes everything that belongs to it.

use crate::{
    config::settings::TripDefaults,
    core::{
        currency::{self, NewCurrency},
        member::{self, NewMember},
    },
    entities::{
        Currency, Expense, ExpenseShare, Member, Transaction, Trip, currency as currency_entity,
        expense, expense_share, member as member_entity, transaction, trip,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Everything needed to create a trip.
#[derive(Debug, Clone)]
pub struct NewTrip {
    /// Trip name, must not be blank
    pub name: String,
    /// Destination
    pub location: String,
    /// First day
    pub start_date: NaiveDate,
    /// Last day, not before `start_date`
    pub end_date: NaiveDate,
    /// Initial members; one unnamed member is added when empty
    pub members: Vec<NewMember>,
    /// Initial currencies; the configured default is added when empty
    pub currencies: Vec<NewCurrency>,
}

/// Search criteria for the trip list. Every active clause must match.
#[derive(Debug, Clone, Default)]
pub struct TripFilter {
    /// Case-insensitive substring of the name or location; empty matches everything
    pub key_phrase: String,
    /// Only trips starting on or after this date
    pub start_after: Option<NaiveDate>,
    /// Only trips ending on or before this date
    pub end_before: Option<NaiveDate>,
}

impl TripFilter {
    /// Whether `trip` satisfies all active clauses.
    #[must_use]
    pub fn matches(&self, trip: &trip::Model) -> bool {
        let phrase = self.key_phrase.trim().to_lowercase();
        let phrase_matches = phrase.is_empty()
            || trip.name.to_lowercase().contains(&phrase)
            || trip.location.to_lowercase().contains(&phrase);

        phrase_matches
            && self.start_after.is_none_or(|start| trip.start_date >= start)
            && self.end_before.is_none_or(|end| trip.end_date <= end)
    }
}

/// Finds a trip by id or fails with [`Error::TripNotFound`].
pub async fn require_trip<C>(db: &C, trip_id: i64) -> Result<trip::Model>
where
    C: ConnectionTrait,
{
    Trip::find_by_id(trip_id)
        .one(db)
        .await?
        .ok_or(Error::TripNotFound { id: trip_id })
}

/// Creates a trip together with its initial members and currencies.
///
/// Validates the name and date range before touching the database. Missing members or
/// currencies are filled from `defaults`, so every new trip can be settled right away.
#[instrument(skip(db, new_trip, defaults), fields(name = %new_trip.name))]
pub async fn create_trip(
    db: &DatabaseConnection,
    new_trip: NewTrip,
    defaults: &TripDefaults,
) -> Result<trip::Model> {
    let name = new_trip.name.trim();
    if name.is_empty() {
        return Err(Error::Config {
            message: "Trip name cannot be empty".to_string(),
        });
    }
    if new_trip.start_date > new_trip.end_date {
        return Err(Error::InvalidDateRange);
    }

    let members = if new_trip.members.is_empty() {
        vec![NewMember {
            name: String::new(),
            weight: None,
        }]
    } else {
        new_trip.members
    };
    let currencies = if new_trip.currencies.is_empty() {
        vec![NewCurrency {
            name: defaults.currency_name.clone(),
            abbreviation: defaults.currency_abbreviation.clone(),
        }]
    } else {
        new_trip.currencies
    };

    // Use a transaction so a trip never exists without its roster
    let txn = db.begin().await?;

    let trip = trip::ActiveModel {
        name: Set(name.to_string()),
        location: Set(new_trip.location.trim().to_string()),
        start_date: Set(new_trip.start_date),
        end_date: Set(new_trip.end_date),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for new_member in members {
        member::insert_member(&txn, trip.id, new_member, defaults.member_weight).await?;
    }
    for new_currency in currencies {
        currency::insert_currency(&txn, trip.id, new_currency).await?;
    }

    txn.commit().await?;
    info!(trip_id = trip.id, "Trip created");
    Ok(trip)
}

/// Retrieves a trip by id.
pub async fn get_trip_by_id(db: &DatabaseConnection, trip_id: i64) -> Result<Option<trip::Model>> {
    Trip::find_by_id(trip_id).one(db).await.map_err(Into::into)
}

/// Retrieves all trips, most recent start date first, then most recent end date.
pub async fn list_trips(db: &DatabaseConnection) -> Result<Vec<trip::Model>> {
    Trip::find()
        .order_by_desc(trip::Column::StartDate)
        .order_by_desc(trip::Column::EndDate)
        .order_by_asc(trip::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the trips matching `filter`, in [`list_trips`] order.
pub async fn search_trips(db: &DatabaseConnection, filter: &TripFilter) -> Result<Vec<trip::Model>> {
    let trips = list_trips(db).await?;
    Ok(trips.into_iter().filter(|t| filter.matches(t)).collect())
}

/// Deletes a trip and every row scoped to it.
#[instrument(skip(db))]
pub async fn delete_trip(db: &DatabaseConnection, trip_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    require_trip(&txn, trip_id).await?;

    let expense_ids: Vec<i64> = Expense::find()
        .filter(expense::Column::TripId.eq(trip_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|e| e.id)
        .collect();

    // Children first so foreign keys are never left dangling
    if !expense_ids.is_empty() {
        ExpenseShare::delete_many()
            .filter(expense_share::Column::ExpenseId.is_in(expense_ids))
            .exec(&txn)
            .await?;
    }
    Expense::delete_many()
        .filter(expense::Column::TripId.eq(trip_id))
        .exec(&txn)
        .await?;
    Transaction::delete_many()
        .filter(transaction::Column::TripId.eq(trip_id))
        .exec(&txn)
        .await?;
    Currency::delete_many()
        .filter(currency_entity::Column::TripId.eq(trip_id))
        .exec(&txn)
        .await?;
    Member::delete_many()
        .filter(member_entity::Column::TripId.eq(trip_id))
        .exec(&txn)
        .await?;
    Trip::delete_by_id(trip_id).exec(&txn).await?;

    txn.commit().await?;
    info!(trip_id, "Trip deleted");
    Ok(())
}
