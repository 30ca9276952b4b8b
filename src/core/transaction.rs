//! Settling transaction business logic - Direct payments between two members.
//!
//! Transactions are recorded independently of expenses and are never edited; a wrong
//! entry is deleted and recorded again. Both sides and the currency are checked against
//! the trip before anything is written.

use crate::{
    core::{currency::require_currency_in_trip, member::require_member_in_trip, trip::require_trip},
    entities::{Transaction, transaction},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// A settling payment to be recorded.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Trip the payment belongs to
    pub trip_id: i64,
    /// Member handing over the money
    pub payer_id: i64,
    /// Member receiving it, distinct from the payer
    pub recipient_id: i64,
    /// Amount, finite and positive
    pub amount: f64,
    /// Currency of the payment
    pub currency_id: i64,
    /// When the payment happened
    pub date: DateTime<Utc>,
}

/// Records a settling payment.
///
/// # Errors
/// - [`Error::InvalidAmount`] when the amount is not a positive finite number
/// - [`Error::SameMember`] when payer and recipient are the same member
/// - [`Error::TripNotFound`], [`Error::MemberNotFound`], [`Error::CurrencyNotFound`] when
///   a referenced row is missing or belongs to another trip
#[instrument(skip(db, new_transaction), fields(trip_id = new_transaction.trip_id))]
pub async fn create_transaction(
    db: &DatabaseConnection,
    new_transaction: NewTransaction,
) -> Result<transaction::Model> {
    let amount = new_transaction.amount;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    if new_transaction.payer_id == new_transaction.recipient_id {
        return Err(Error::SameMember {
            id: new_transaction.payer_id,
        });
    }

    let trip_id = new_transaction.trip_id;
    require_trip(db, trip_id).await?;
    require_member_in_trip(db, trip_id, new_transaction.payer_id).await?;
    require_member_in_trip(db, trip_id, new_transaction.recipient_id).await?;
    require_currency_in_trip(db, trip_id, new_transaction.currency_id).await?;

    let result = transaction::ActiveModel {
        trip_id: Set(trip_id),
        payer_id: Set(new_transaction.payer_id),
        recipient_id: Set(new_transaction.recipient_id),
        amount: Set(amount),
        currency_id: Set(new_transaction.currency_id),
        date: Set(new_transaction.date),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(transaction_id = result.id, amount, "Transaction recorded");
    Ok(result)
}

/// Retrieves all transactions of a trip, newest first.
pub async fn get_transactions_for_trip<C>(db: &C, trip_id: i64) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find()
        .filter(transaction::Column::TripId.eq(trip_id))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific transaction by its unique ID.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deletes a transaction.
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    let result = Transaction::delete_by_id(transaction_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::TransactionNotFound { id: transaction_id });
    }
    Ok(())
}
