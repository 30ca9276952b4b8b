//! Currency business logic - The currencies a trip's expenses can be logged in.
//!
//! Currencies are listed in insertion order; the first one is the trip's reference
//! currency for combined balances.

use crate::{
    core::trip::require_trip,
    entities::{Currency, Expense, ExpenseShare, Transaction, currency, expense, expense_share, transaction},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// A currency to be added to a trip.
#[derive(Debug, Clone)]
pub struct NewCurrency {
    /// Full name
    pub name: String,
    /// Short code; trimmed and upper-cased before storing
    pub abbreviation: String,
}

pub(crate) async fn insert_currency<C>(
    db: &C,
    trip_id: i64,
    new_currency: NewCurrency,
) -> Result<currency::Model>
where
    C: ConnectionTrait,
{
    let abbreviation = new_currency.abbreviation.trim().to_uppercase();
    if abbreviation.is_empty() {
        return Err(Error::Config {
            message: "Currency abbreviation cannot be empty".to_string(),
        });
    }

    currency::ActiveModel {
        name: Set(new_currency.name.trim().to_string()),
        abbreviation: Set(abbreviation),
        trip_id: Set(trip_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Adds a currency to an existing trip.
#[instrument(skip(db, new_currency))]
pub async fn add_currency(
    db: &DatabaseConnection,
    trip_id: i64,
    new_currency: NewCurrency,
) -> Result<currency::Model> {
    require_trip(db, trip_id).await?;
    let currency = insert_currency(db, trip_id, new_currency).await?;
    info!(currency_id = currency.id, abbreviation = %currency.abbreviation, "Currency added");
    Ok(currency)
}

/// Retrieves the currencies of a trip, reference currency first.
pub async fn get_currencies_for_trip<C>(db: &C, trip_id: i64) -> Result<Vec<currency::Model>>
where
    C: ConnectionTrait,
{
    Currency::find()
        .filter(currency::Column::TripId.eq(trip_id))
        .order_by_asc(currency::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a currency that belongs to `trip_id`, or fails with [`Error::CurrencyNotFound`].
pub async fn require_currency_in_trip<C>(
    db: &C,
    trip_id: i64,
    currency_id: i64,
) -> Result<currency::Model>
where
    C: ConnectionTrait,
{
    Currency::find_by_id(currency_id)
        .filter(currency::Column::TripId.eq(trip_id))
        .one(db)
        .await?
        .ok_or(Error::CurrencyNotFound { id: currency_id })
}

/// Removes a currency together with the expenses and transactions logged in it.
#[instrument(skip(db))]
pub async fn delete_currency(db: &DatabaseConnection, currency_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    Currency::find_by_id(currency_id)
        .one(&txn)
        .await?
        .ok_or(Error::CurrencyNotFound { id: currency_id })?;

    let expense_ids: Vec<i64> = Expense::find()
        .filter(expense::Column::CurrencyId.eq(currency_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|e| e.id)
        .collect();

    if !expense_ids.is_empty() {
        ExpenseShare::delete_many()
            .filter(expense_share::Column::ExpenseId.is_in(expense_ids))
            .exec(&txn)
            .await?;
    }
    Expense::delete_many()
        .filter(expense::Column::CurrencyId.eq(currency_id))
        .exec(&txn)
        .await?;
    Transaction::delete_many()
        .filter(transaction::Column::CurrencyId.eq(currency_id))
        .exec(&txn)
        .await?;
    Currency::delete_by_id(currency_id).exec(&txn).await?;

    txn.commit().await?;
    info!(currency_id, "Currency deleted");
    Ok(())
}
