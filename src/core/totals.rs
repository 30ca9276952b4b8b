//! Dense per-member, per-currency result tables.
//!
//! A [`TotalTable`] holds exactly one [`TotalEntry`] for every (member, currency)
//! pair of a trip, grouped by member and then by currency in the order the
//! member and currency lists were given. Consumers can rely on every pair being
//! present even when nothing references it.

use crate::entities::{currency, member};
use serde::Serialize;

/// One member's running total in one currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalEntry {
    /// Member the amount belongs to
    pub member_id: i64,
    /// Currency the amount is denominated in
    pub currency_id: i64,
    /// Abbreviation of that currency, carried for display
    pub abbreviation: String,
    /// Unrounded amount
    pub amount: f64,
}

/// Member-major table of [`TotalEntry`] values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TotalTable {
    entries: Vec<TotalEntry>,
    member_ids: Vec<i64>,
    currency_ids: Vec<i64>,
}

impl TotalTable {
    /// Builds a zero-valued table covering every (member, currency) pair.
    ///
    /// If either list is empty the table is empty.
    #[must_use]
    pub fn zeroed(members: &[member::Model], currencies: &[currency::Model]) -> Self {
        if members.is_empty() || currencies.is_empty() {
            return Self::default();
        }

        let entries = members
            .iter()
            .flat_map(|m| {
                currencies.iter().map(move |c| TotalEntry {
                    member_id: m.id,
                    currency_id: c.id,
                    abbreviation: c.abbreviation.clone(),
                    amount: 0.0,
                })
            })
            .collect();

        Self {
            entries,
            member_ids: members.iter().map(|m| m.id).collect(),
            currency_ids: currencies.iter().map(|c| c.id).collect(),
        }
    }

    fn position(&self, member_id: i64, currency_id: i64) -> Option<usize> {
        let row = self.member_ids.iter().position(|&id| id == member_id)?;
        let column = self.currency_ids.iter().position(|&id| id == currency_id)?;
        Some(row * self.currency_ids.len() + column)
    }

    /// Looks up the entry for a pair, `None` if either id is not in the table.
    #[must_use]
    pub fn get(&self, member_id: i64, currency_id: i64) -> Option<&TotalEntry> {
        self.position(member_id, currency_id)
            .map(|index| &self.entries[index])
    }

    /// Amount for a pair, `None` if either id is not in the table.
    #[must_use]
    pub fn amount(&self, member_id: i64, currency_id: i64) -> Option<f64> {
        self.get(member_id, currency_id).map(|entry| entry.amount)
    }

    /// Adds `delta` to a pair. Returns `false` when the pair does not exist.
    pub fn add(&mut self, member_id: i64, currency_id: i64, delta: f64) -> bool {
        match self.position(member_id, currency_id) {
            Some(index) => {
                self.entries[index].amount += delta;
                true
            }
            None => false,
        }
    }

    /// Whether the currency is one of the table's columns.
    #[must_use]
    pub fn has_currency(&self, currency_id: i64) -> bool {
        self.currency_ids.contains(&currency_id)
    }

    /// Whether the member is one of the table's rows.
    #[must_use]
    pub fn has_member(&self, member_id: i64) -> bool {
        self.member_ids.contains(&member_id)
    }

    /// Entries of one member, in currency order.
    #[must_use]
    pub fn for_member(&self, member_id: i64) -> &[TotalEntry] {
        let width = self.currency_ids.len();
        match self.member_ids.iter().position(|&id| id == member_id) {
            Some(row) => &self.entries[row * width..(row + 1) * width],
            None => &[],
        }
    }

    /// Member ids in row order.
    #[must_use]
    pub fn member_ids(&self) -> &[i64] {
        &self.member_ids
    }

    /// All entries, member-major.
    #[must_use]
    pub fn entries(&self) -> &[TotalEntry] {
        &self.entries
    }

    /// Number of entries (`members × currencies`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{sample_currency, sample_member};

    #[test]
    fn test_zeroed_is_member_major() {
        let members = vec![sample_member(1, "A"), sample_member(2, "B")];
        let currencies = vec![sample_currency(10, "SGD"), sample_currency(11, "JPY")];
        let table = TotalTable::zeroed(&members, &currencies);

        let pairs: Vec<(i64, i64)> = table
            .entries()
            .iter()
            .map(|e| (e.member_id, e.currency_id))
            .collect();
        assert_eq!(pairs, vec![(1, 10), (1, 11), (2, 10), (2, 11)]);
        assert!(table.entries().iter().all(|e| e.amount == 0.0));
        assert_eq!(table.get(2, 11).unwrap().abbreviation, "JPY");
    }

    #[test]
    fn test_zeroed_empty_inputs() {
        let members = vec![sample_member(1, "A")];
        let currencies = vec![sample_currency(10, "SGD")];
        assert!(TotalTable::zeroed(&members, &[]).is_empty());
        assert!(TotalTable::zeroed(&[], &currencies).is_empty());
    }

    #[test]
    fn test_add_and_unknown_pair() {
        let members = vec![sample_member(1, "A")];
        let currencies = vec![sample_currency(10, "SGD")];
        let mut table = TotalTable::zeroed(&members, &currencies);

        assert!(table.add(1, 10, 12.5));
        assert!(table.add(1, 10, -2.5));
        assert_eq!(table.amount(1, 10), Some(10.0));

        assert!(!table.add(2, 10, 1.0));
        assert!(!table.add(1, 99, 1.0));
        assert_eq!(table.amount(2, 10), None);
    }

    #[test]
    fn test_for_member_slices_one_row() {
        let members = vec![sample_member(1, "A"), sample_member(2, "B")];
        let currencies = vec![sample_currency(10, "SGD"), sample_currency(11, "JPY")];
        let mut table = TotalTable::zeroed(&members, &currencies);
        table.add(2, 11, 7.0);

        let row = table.for_member(2);
        assert_eq!(row.len(), 2);
        assert_eq!(row[0].currency_id, 10);
        assert_eq!(row[1].amount, 7.0);
        assert!(table.for_member(3).is_empty());
    }
}
