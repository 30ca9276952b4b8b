//! Member business logic - Adding, listing and removing the people on a trip.
//!
//! Removing a member also removes their expense shares, the expenses they paid and
//! every transaction they took part in, so later settlements never see dangling rows.
//! Expenses whose remaining shares sum to zero are removed as well.

use crate::{
    config::settings::TripDefaults,
    core::trip::require_trip,
    entities::{Expense, ExpenseShare, Member, Transaction, expense, expense_share, member, transaction},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// A member to be added to a trip.
#[derive(Debug, Clone)]
pub struct NewMember {
    /// Display name, may be blank
    pub name: String,
    /// Default proration weight; the configured default when `None`
    pub weight: Option<f64>,
}

pub(crate) async fn insert_member<C>(
    db: &C,
    trip_id: i64,
    new_member: NewMember,
    default_weight: f64,
) -> Result<member::Model>
where
    C: ConnectionTrait,
{
    let weight = new_member.weight.unwrap_or(default_weight);
    if !weight.is_finite() || weight < 0.0 {
        return Err(Error::InvalidShares {
            reason: format!("member weight must be a non-negative number, got {weight}"),
        });
    }

    member::ActiveModel {
        name: Set(new_member.name.trim().to_string()),
        weight: Set(weight),
        trip_id: Set(trip_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Adds a member to an existing trip.
///
/// Existing expenses are unaffected; the new member simply has no share in them.
#[instrument(skip(db, new_member, defaults))]
pub async fn add_member(
    db: &DatabaseConnection,
    trip_id: i64,
    new_member: NewMember,
    defaults: &TripDefaults,
) -> Result<member::Model> {
    require_trip(db, trip_id).await?;
    let member = insert_member(db, trip_id, new_member, defaults.member_weight).await?;
    info!(member_id = member.id, "Member added");
    Ok(member)
}

/// Retrieves the members of a trip in the order they were added.
pub async fn get_members_for_trip<C>(db: &C, trip_id: i64) -> Result<Vec<member::Model>>
where
    C: ConnectionTrait,
{
    Member::find()
        .filter(member::Column::TripId.eq(trip_id))
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a member that belongs to `trip_id`, or fails with [`Error::MemberNotFound`].
pub async fn require_member_in_trip<C>(db: &C, trip_id: i64, member_id: i64) -> Result<member::Model>
where
    C: ConnectionTrait,
{
    Member::find_by_id(member_id)
        .filter(member::Column::TripId.eq(trip_id))
        .one(db)
        .await?
        .ok_or(Error::MemberNotFound { id: member_id })
}

/// Removes a member along with their shares, paid expenses and transactions.
///
/// Expenses paid by someone else that only the removed member had weight in are
/// removed too, since nobody is left to split them.
#[instrument(skip(db))]
pub async fn delete_member(db: &DatabaseConnection, member_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    Member::find_by_id(member_id)
        .one(&txn)
        .await?
        .ok_or(Error::MemberNotFound { id: member_id })?;

    let paid_expense_ids: Vec<i64> = Expense::find()
        .filter(expense::Column::PayerId.eq(member_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|e| e.id)
        .collect();

    let shared_expense_ids: Vec<i64> = ExpenseShare::find()
        .filter(expense_share::Column::MemberId.eq(member_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|s| s.expense_id)
        .filter(|id| !paid_expense_ids.contains(id))
        .collect();

    let mut shares = Condition::any().add(expense_share::Column::MemberId.eq(member_id));
    if !paid_expense_ids.is_empty() {
        shares = shares.add(expense_share::Column::ExpenseId.is_in(paid_expense_ids));
    }
    ExpenseShare::delete_many().filter(shares).exec(&txn).await?;

    // Expenses left with no positive weight could no longer be split
    let orphaned = unsplittable_expenses(&txn, &shared_expense_ids).await?;
    if !orphaned.is_empty() {
        ExpenseShare::delete_many()
            .filter(expense_share::Column::ExpenseId.is_in(orphaned.clone()))
            .exec(&txn)
            .await?;
    }

    let removed_expenses = Expense::delete_many()
        .filter(
            Condition::any()
                .add(expense::Column::PayerId.eq(member_id))
                .add(expense::Column::Id.is_in(orphaned)),
        )
        .exec(&txn)
        .await?;
    Transaction::delete_many()
        .filter(
            Condition::any()
                .add(transaction::Column::PayerId.eq(member_id))
                .add(transaction::Column::RecipientId.eq(member_id)),
        )
        .exec(&txn)
        .await?;
    Member::delete_by_id(member_id).exec(&txn).await?;

    txn.commit().await?;
    info!(
        member_id,
        expenses_removed = removed_expenses.rows_affected,
        "Member deleted"
    );
    Ok(())
}

/// Ids among `expense_ids` whose remaining shares no longer sum to a positive weight.
async fn unsplittable_expenses<C>(db: &C, expense_ids: &[i64]) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    if expense_ids.is_empty() {
        return Ok(Vec::new());
    }

    let remaining = ExpenseShare::find()
        .filter(expense_share::Column::ExpenseId.is_in(expense_ids.iter().copied()))
        .all(db)
        .await?;

    Ok(expense_ids
        .iter()
        .copied()
        .filter(|&id| {
            let sum: f64 = remaining
                .iter()
                .filter(|s| s.expense_id == id)
                .map(|s| s.share)
                .sum();
            !(sum.is_finite() && sum > 0.0)
        })
        .collect())
}
