//! Report generation business logic.
//!
//! This module loads a consistent snapshot of a trip, runs the settlement calculator
//! on it, and formats the results for display. Rounding happens here and nowhere
//! else; the totals themselves stay unrounded.

use crate::{
    core::{
        currency::get_currencies_for_trip,
        expense::load_expense_records,
        member::get_members_for_trip,
        normalizer::{ExchangeRates, combine_table},
        settlement::{SettlementCalculator, SettlementTotals},
        totals::{TotalEntry, TotalTable},
        transaction::get_transactions_for_trip,
        trip::require_trip,
    },
    entities::{currency, member, trip},
    errors::Result,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::instrument;

/// A trip's roster together with its computed totals.
#[derive(Debug, Clone)]
pub struct TripOverview {
    /// The trip being reported on
    pub trip: trip::Model,
    /// Members in table row order
    pub members: Vec<member::Model>,
    /// Currencies in table column order, reference first
    pub currencies: Vec<currency::Model>,
    /// Paid, personal-share and balance totals
    pub totals: SettlementTotals,
}

impl TripOverview {
    /// Display name of a member, falling back to its id for unnamed members.
    #[must_use]
    pub fn member_name(&self, member_id: i64) -> String {
        self.members
            .iter()
            .find(|m| m.id == member_id && !m.name.is_empty())
            .map_or_else(|| format!("Member {member_id}"), |m| m.name.clone())
    }

    /// Balances collapsed into the reference currency, one entry per member.
    pub fn combined_balances(&self, rates: &ExchangeRates) -> Result<Vec<TotalEntry>> {
        combine_table(&self.totals.total_balance, rates)
    }
}

/// Generates the overview for a trip.
///
/// Members, currencies, expenses and transactions are read inside one database
/// transaction so the calculator sees a consistent snapshot.
#[instrument(skip(db))]
pub async fn generate_trip_overview(db: &DatabaseConnection, trip_id: i64) -> Result<TripOverview> {
    let txn = db.begin().await?;
    let trip = require_trip(&txn, trip_id).await?;
    let members = get_members_for_trip(&txn, trip_id).await?;
    let currencies = get_currencies_for_trip(&txn, trip_id).await?;
    let expenses = load_expense_records(&txn, trip_id).await?;
    let transactions = get_transactions_for_trip(&txn, trip_id).await?;
    txn.commit().await?;

    let totals = SettlementCalculator.compute(&members, &currencies, &expenses, &transactions);

    Ok(TripOverview {
        trip,
        members,
        currencies,
        totals,
    })
}

/// Formats an amount with a fixed number of decimals followed by its currency.
///
/// Values that round to zero are shown without a minus sign.
#[must_use]
pub fn format_amount(amount: f64, abbreviation: &str, decimals: usize) -> String {
    let mut number = format!("{amount:.decimals$}");
    if number.starts_with('-') && number[1..].chars().all(|c| c == '0' || c == '.') {
        number.remove(0);
    }
    format!("{number} {abbreviation}")
}

fn format_row(entries: &[TotalEntry], decimals: usize) -> String {
    entries
        .iter()
        .map(|e| format_amount(e.amount, &e.abbreviation, decimals))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn write_section(out: &mut String, overview: &TripOverview, title: &str, table: &TotalTable, decimals: usize) {
    out.push_str(title);
    out.push('\n');
    for &member_id in table.member_ids() {
        out.push_str(&format!(
            "  {}: {}\n",
            overview.member_name(member_id),
            format_row(table.for_member(member_id), decimals)
        ));
    }
}

/// Renders the three overview sections, grouped per member.
#[must_use]
pub fn format_overview(overview: &TripOverview, decimals: usize) -> String {
    let mut out = format!("{} ({})\n", overview.trip.name, overview.trip.location);
    write_section(&mut out, overview, "Total Paid", &overview.totals.total_paid, decimals);
    write_section(
        &mut out,
        overview,
        "Personal Expenses",
        &overview.totals.total_expense,
        decimals,
    );
    write_section(&mut out, overview, "Balance", &overview.totals.total_balance, decimals);
    out
}

/// Renders one combined balance line per member.
#[must_use]
pub fn format_combined(overview: &TripOverview, combined: &[TotalEntry], decimals: usize) -> String {
    let mut out = String::from("Combined Balance\n");
    for entry in combined {
        out.push_str(&format!(
            "  {}: {}\n",
            overview.member_name(entry.member_id),
            format_amount(entry.amount, &entry.abbreviation, decimals)
        ));
    }
    out
}
