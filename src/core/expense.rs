//! Expense business logic - Logging, resolving and removing weighted expenses.
//!
//! Every expense is stored with one share row per trip member. Shares are validated
//! when the expense is created, so an expense whose weights sum to zero never reaches
//! the settlement calculator through this module. [`load_expense_records`] is the input
//! adapter that hands expenses to the calculator with their shares as a map.

use crate::{
    core::{
        currency::require_currency_in_trip,
        member::{get_members_for_trip, require_member_in_trip},
        settlement::ExpenseRecord,
        trip::require_trip,
    },
    entities::{Expense, ExpenseShare, expense, expense_share, member},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// An expense to be logged.
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Trip the expense belongs to
    pub trip_id: i64,
    /// Short description, must not be blank
    pub name: String,
    /// Member who paid
    pub payer_id: i64,
    /// Amount paid, finite and positive
    pub amount: f64,
    /// Currency of the amount
    pub currency_id: i64,
    /// When the expense happened
    pub date: DateTime<Utc>,
    /// Proration weight per member id; trip members left out get 0
    pub shares: HashMap<i64, f64>,
}

fn validate_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidAmount { amount })
    }
}

/// Checks that `shares` only name trip members, are non-negative and sum to a positive weight.
pub fn validate_shares(shares: &HashMap<i64, f64>, members: &[member::Model]) -> Result<()> {
    for (&member_id, &share) in shares {
        if !members.iter().any(|m| m.id == member_id) {
            return Err(Error::MemberNotFound { id: member_id });
        }
        if !share.is_finite() || share < 0.0 {
            return Err(Error::InvalidShares {
                reason: format!("share for member {member_id} must be a non-negative number, got {share}"),
            });
        }
    }

    let total: f64 = shares.values().sum();
    if total > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidShares {
            reason: "shares must sum to more than zero".to_string(),
        })
    }
}

/// Logs a new expense with its shares.
///
/// # Errors
/// - [`Error::InvalidAmount`] when the amount is not a positive finite number
/// - [`Error::Config`] for a blank name
/// - [`Error::TripNotFound`], [`Error::MemberNotFound`], [`Error::CurrencyNotFound`] when
///   the trip, payer, a share holder, or the currency does not belong together
/// - [`Error::InvalidShares`] for negative weights or weights summing to zero
#[instrument(skip(db, new_expense), fields(trip_id = new_expense.trip_id))]
pub async fn create_expense(db: &DatabaseConnection, new_expense: NewExpense) -> Result<expense::Model> {
    validate_amount(new_expense.amount)?;
    let name = new_expense.name.trim();
    if name.is_empty() {
        return Err(Error::Config {
            message: "Expense name cannot be empty".to_string(),
        });
    }

    // Use a transaction so the expense and its shares land together
    let txn = db.begin().await?;

    require_trip(&txn, new_expense.trip_id).await?;
    require_member_in_trip(&txn, new_expense.trip_id, new_expense.payer_id).await?;
    require_currency_in_trip(&txn, new_expense.trip_id, new_expense.currency_id).await?;
    let members = get_members_for_trip(&txn, new_expense.trip_id).await?;
    validate_shares(&new_expense.shares, &members)?;

    let expense = expense::ActiveModel {
        trip_id: Set(new_expense.trip_id),
        name: Set(name.to_string()),
        payer_id: Set(new_expense.payer_id),
        amount: Set(new_expense.amount),
        currency_id: Set(new_expense.currency_id),
        date: Set(new_expense.date),
        is_resolved: Set(false),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let share_rows = members.iter().map(|m| expense_share::ActiveModel {
        expense_id: Set(expense.id),
        member_id: Set(m.id),
        share: Set(new_expense.shares.get(&m.id).copied().unwrap_or(0.0)),
        ..Default::default()
    });
    ExpenseShare::insert_many(share_rows).exec(&txn).await?;

    txn.commit().await?;
    info!(expense_id = expense.id, amount = expense.amount, "Expense created");
    Ok(expense)
}

/// Retrieves a specific expense by its unique ID.
pub async fn get_expense_by_id(
    db: &DatabaseConnection,
    expense_id: i64,
) -> Result<Option<expense::Model>> {
    Expense::find_by_id(expense_id).one(db).await.map_err(Into::into)
}

/// Retrieves all expenses of a trip, newest first.
pub async fn get_expenses_for_trip(
    db: &DatabaseConnection,
    trip_id: i64,
) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::TripId.eq(trip_id))
        .order_by_desc(expense::Column::Date)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks an expense as resolved or outstanding.
pub async fn set_expense_resolved(
    db: &DatabaseConnection,
    expense_id: i64,
    is_resolved: bool,
) -> Result<expense::Model> {
    let expense = Expense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?;

    let mut active: expense::ActiveModel = expense.into();
    active.is_resolved = Set(is_resolved);
    let updated = active.update(db).await?;
    debug!(expense_id, is_resolved, "Expense resolution updated");
    Ok(updated)
}

/// Deletes an expense and its shares.
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let expense = Expense::find_by_id(expense_id)
        .one(&txn)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?;

    ExpenseShare::delete_many()
        .filter(expense_share::Column::ExpenseId.eq(expense_id))
        .exec(&txn)
        .await?;
    expense.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Loads every expense of a trip with its shares projected into a member-id map.
///
/// Records come back in expense id order.
pub async fn load_expense_records<C>(db: &C, trip_id: i64) -> Result<Vec<ExpenseRecord>>
where
    C: ConnectionTrait,
{
    let rows = Expense::find()
        .filter(expense::Column::TripId.eq(trip_id))
        .order_by_asc(expense::Column::Id)
        .find_with_related(ExpenseShare)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(expense, shares)| ExpenseRecord {
            expense,
            shares: shares.into_iter().map(|s| (s.member_id, s.share)).collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn draft(seeded: &TestTrip, shares: &[(usize, f64)]) -> NewExpense {
        NewExpense {
            trip_id: seeded.trip.id,
            name: "Dinner".to_string(),
            payer_id: seeded.members[0].id,
            amount: 90.0,
            currency_id: seeded.currencies[0].id,
            date: day(3),
            shares: shares
                .iter()
                .map(|&(index, share)| (seeded.members[index].id, share))
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_create_expense_amount_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let base = NewExpense {
            trip_id: 1,
            name: "Taxi".to_string(),
            payer_id: 1,
            amount: 0.0,
            currency_id: 1,
            date: day(0),
            shares: HashMap::from([(1, 1.0)]),
        };

        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = create_expense(
                &db,
                NewExpense {
                    amount,
                    ..base.clone()
                },
            )
            .await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }

        let result = create_expense(
            &db,
            NewExpense {
                amount: 5.0,
                name: "  ".to_string(),
                ..base
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Config { .. })));

        Ok(())
    }

    #[test]
    fn test_validate_shares() {
        let members = vec![sample_member(1, "A"), sample_member(2, "B")];

        assert!(validate_shares(&HashMap::from([(1, 1.0), (2, 0.0)]), &members).is_ok());
        assert!(matches!(
            validate_shares(&HashMap::from([(1, 0.0), (2, 0.0)]), &members),
            Err(Error::InvalidShares { .. })
        ));
        assert!(matches!(
            validate_shares(&HashMap::new(), &members),
            Err(Error::InvalidShares { .. })
        ));
        assert!(matches!(
            validate_shares(&HashMap::from([(1, -1.0), (2, 3.0)]), &members),
            Err(Error::InvalidShares { .. })
        ));
        assert!(matches!(
            validate_shares(&HashMap::from([(9, 1.0)]), &members),
            Err(Error::MemberNotFound { id: 9 })
        ));
    }

    #[tokio::test]
    async fn test_create_expense_stores_share_per_member() -> Result<()> {
        let (db, seeded) = setup_with_trip().await?;

        let created = create_expense(&db, draft(&seeded, &[(0, 2.0)])).await?;
        assert_eq!(created.name, "Dinner");
        assert!(!created.is_resolved);

        let records = load_expense_records(&db, seeded.trip.id).await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].expense, created);
        assert_eq!(records[0].shares.len(), 2);
        assert_eq!(records[0].share_of(seeded.members[0].id), 2.0);
        assert_eq!(records[0].share_of(seeded.members[1].id), 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_rejects_zero_weight() -> Result<()> {
        let (db, seeded) = setup_with_trip().await?;
        let result = create_expense(&db, draft(&seeded, &[(0, 0.0), (1, 0.0)])).await;
        assert!(matches!(result, Err(Error::InvalidShares { .. })));
        assert!(get_expenses_for_trip(&db, seeded.trip.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_rejects_foreign_rows() -> Result<()> {
        let (db, seeded) = setup_with_trip().await?;
        let other = create_test_trip(&db, new_trip("Other", &["Zed"], &["USD"])).await?;

        let mut foreign_payer = draft(&seeded, &[(0, 1.0)]);
        foreign_payer.payer_id = other.members[0].id;
        let result = create_expense(&db, foreign_payer).await;
        assert!(matches!(result, Err(Error::MemberNotFound { .. })));

        let mut foreign_currency = draft(&seeded, &[(0, 1.0)]);
        foreign_currency.currency_id = other.currencies[0].id;
        let result = create_expense(&db, foreign_currency).await;
        assert!(matches!(result, Err(Error::CurrencyNotFound { .. })));

        let mut foreign_share = draft(&seeded, &[(0, 1.0)]);
        foreign_share.shares.insert(other.members[0].id, 1.0);
        let result = create_expense(&db, foreign_share).await;
        assert!(matches!(result, Err(Error::MemberNotFound { .. })));

        let mut missing_trip = draft(&seeded, &[(0, 1.0)]);
        missing_trip.trip_id = 999;
        let result = create_expense(&db, missing_trip).await;
        assert!(matches!(result, Err(Error::TripNotFound { id: 999 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_expenses_newest_first() -> Result<()> {
        let (db, seeded) = setup_with_trip().await?;
        let mut older = draft(&seeded, &[(0, 1.0)]);
        older.date = day(1);
        let mut newer = draft(&seeded, &[(0, 1.0)]);
        newer.date = day(5);

        let older = create_expense(&db, older).await?;
        let newer = create_expense(&db, newer).await?;

        let listed = get_expenses_for_trip(&db, seeded.trip.id).await?;
        assert_eq!(listed, vec![newer, older]);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_expense_resolved_round_trip() -> Result<()> {
        let (db, seeded) = setup_with_trip().await?;
        let created = create_even_expense(&db, &seeded, 0, 10.0, 0).await?;

        let resolved = set_expense_resolved(&db, created.id, true).await?;
        assert!(resolved.is_resolved);
        let reopened = set_expense_resolved(&db, created.id, false).await?;
        assert!(!reopened.is_resolved);
        assert_eq!(reopened.amount, created.amount);

        let result = set_expense_resolved(&db, 999, true).await;
        assert!(matches!(result, Err(Error::ExpenseNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_expense_removes_shares() -> Result<()> {
        let (db, seeded) = setup_with_trip().await?;
        let created = create_even_expense(&db, &seeded, 0, 10.0, 0).await?;

        delete_expense(&db, created.id).await?;
        assert!(get_expense_by_id(&db, created.id).await?.is_none());
        assert_eq!(ExpenseShare::find().count(&db).await?, 0);

        let result = delete_expense(&db, created.id).await;
        assert!(matches!(result, Err(Error::ExpenseNotFound { .. })));
        Ok(())
    }
}
