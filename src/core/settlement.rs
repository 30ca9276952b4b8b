//! Settlement calculation - turns a trip snapshot into paid, share and balance totals.
//!
//! The calculator is a pure function over already-loaded rows. It is recomputed
//! from scratch whenever the trip changes; nothing is cached. Amounts are left
//! unrounded here, rounding belongs to [`crate::core::report`].
//!
//! Rows that cannot be applied (unknown currency or member, shares summing to
//! zero) are skipped with a warning so one bad row never blanks a whole overview.

use crate::core::totals::TotalTable;
use crate::entities::{currency, expense, member, transaction};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// An expense together with its per-member shares.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    /// The stored expense row
    pub expense: expense::Model,
    /// Proration weight per member id; absent members count as 0
    pub shares: HashMap<i64, f64>,
}

impl ExpenseRecord {
    /// Sum of the share weights held by `members`.
    ///
    /// Shares keyed by ids outside `members` are ignored.
    #[must_use]
    pub fn total_weight(&self, members: &[member::Model]) -> f64 {
        members.iter().map(|m| self.share_of(m.id)).sum()
    }

    /// Share weight of one member, 0 when absent.
    #[must_use]
    pub fn share_of(&self, member_id: i64) -> f64 {
        self.shares.get(&member_id).copied().unwrap_or(0.0)
    }
}

/// The three aligned result tables for a trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettlementTotals {
    /// Full amounts each member paid for expenses
    pub total_paid: TotalTable,
    /// Each member's prorated share of all expenses
    pub total_expense: TotalTable,
    /// What each member is owed (positive) or owes (negative)
    pub total_balance: TotalTable,
}

/// Settlement calculation service
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementCalculator;

impl SettlementCalculator {
    /// Computes paid, personal-share and balance totals for one trip.
    ///
    /// Every (member, currency) pair gets an entry in each table, even when no row
    /// references it. Transactions are applied to the balance table after all
    /// expenses.
    #[must_use]
    pub fn compute(
        &self,
        members: &[member::Model],
        currencies: &[currency::Model],
        expenses: &[ExpenseRecord],
        transactions: &[transaction::Model],
    ) -> SettlementTotals {
        let mut totals = SettlementTotals {
            total_paid: TotalTable::zeroed(members, currencies),
            total_expense: TotalTable::zeroed(members, currencies),
            total_balance: TotalTable::zeroed(members, currencies),
        };
        if totals.total_paid.is_empty() {
            return totals;
        }

        for record in expenses {
            Self::apply_expense(&mut totals, members, record);
        }
        for transfer in transactions {
            Self::apply_transaction(&mut totals.total_balance, transfer);
        }

        debug!(
            members = members.len(),
            currencies = currencies.len(),
            expenses = expenses.len(),
            transactions = transactions.len(),
            "Settlement computed"
        );
        totals
    }

    fn apply_expense(totals: &mut SettlementTotals, members: &[member::Model], record: &ExpenseRecord) {
        let expense = &record.expense;
        if !totals.total_paid.has_currency(expense.currency_id) {
            warn!(
                expense_id = expense.id,
                currency_id = expense.currency_id,
                "Skipping expense in unknown currency"
            );
            return;
        }
        if !totals.total_paid.has_member(expense.payer_id) {
            warn!(
                expense_id = expense.id,
                payer_id = expense.payer_id,
                "Expense payer is not a trip member, paid amount ignored"
            );
        }

        let sum_weight = record.total_weight(members);
        let shares_usable = sum_weight.is_finite() && sum_weight > 0.0;
        if !shares_usable {
            warn!(
                expense_id = expense.id,
                sum_weight, "Expense shares do not sum to a positive weight, share skipped"
            );
        }

        for member in members {
            let paid = if member.id == expense.payer_id {
                totals
                    .total_paid
                    .add(member.id, expense.currency_id, expense.amount);
                expense.amount
            } else {
                0.0
            };

            if !shares_usable {
                continue;
            }

            let personal_share = expense.amount * (record.share_of(member.id) / sum_weight);
            totals
                .total_expense
                .add(member.id, expense.currency_id, personal_share);

            if !expense.is_resolved {
                totals
                    .total_balance
                    .add(member.id, expense.currency_id, paid - personal_share);
            }
        }
    }

    fn apply_transaction(balance: &mut TotalTable, transfer: &transaction::Model) {
        if !balance.has_currency(transfer.currency_id) {
            warn!(
                transaction_id = transfer.id,
                currency_id = transfer.currency_id,
                "Skipping transaction in unknown currency"
            );
            return;
        }

        if !balance.add(transfer.payer_id, transfer.currency_id, transfer.amount) {
            warn!(
                transaction_id = transfer.id,
                payer_id = transfer.payer_id,
                "Transaction payer is not a trip member"
            );
        }
        if !balance.add(transfer.recipient_id, transfer.currency_id, -transfer.amount) {
            warn!(
                transaction_id = transfer.id,
                recipient_id = transfer.recipient_id,
                "Transaction recipient is not a trip member"
            );
        }
    }
}
