//! Currency normalization - the "combine currencies" view.
//!
//! Rates are indexed by currency position in the trip's currency list.
//! `rates[i]` is how many units of currency `i` equal one unit of the reference
//! currency, which is always the first one and has a fixed rate of 1. A combined
//! figure is therefore `Σ amount[i] / rates[i]`, labelled with the reference
//! currency.

use crate::core::totals::{TotalEntry, TotalTable};
use crate::errors::{Error, Result};

/// User-entered exchange rates for one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRates {
    rates: Vec<f64>,
}

impl ExchangeRates {
    /// Creates rates for `currency_count` currencies, all at parity.
    #[must_use]
    pub fn new(currency_count: usize) -> Self {
        Self {
            rates: vec![1.0; currency_count],
        }
    }

    /// Builds rates from a full list, validating every non-reference entry.
    ///
    /// The first value is ignored and stored as 1.
    pub fn from_rates(rates: &[f64]) -> Result<Self> {
        let mut result = Self::new(rates.len());
        for (index, &rate) in rates.iter().enumerate().skip(1) {
            result.set(index, rate)?;
        }
        Ok(result)
    }

    /// Updates the rate of the currency at `index`.
    ///
    /// # Errors
    /// - [`Error::ReferenceRateFixed`] for index 0
    /// - [`Error::InvalidRate`] for zero, negative or non-finite rates, or an index
    ///   past the end of the currency list
    pub fn set(&mut self, index: usize, rate: f64) -> Result<()> {
        if index == 0 {
            return Err(Error::ReferenceRateFixed);
        }
        if index >= self.rates.len() || !rate.is_finite() || rate <= 0.0 {
            return Err(Error::InvalidRate { index, rate });
        }
        self.rates[index] = rate;
        Ok(())
    }

    /// The rates in currency order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.rates
    }

    /// Number of currencies covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether no currency is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Collapses one member's per-currency entries into a single reference-currency entry.
///
/// `entries` must be that member's row, in trip currency order.
pub fn combine(entries: &[TotalEntry], rates: &ExchangeRates) -> Result<TotalEntry> {
    if entries.is_empty() || entries.len() != rates.len() {
        return Err(Error::RateCountMismatch {
            expected: entries.len(),
            actual: rates.len(),
        });
    }

    let amount = entries
        .iter()
        .zip(rates.as_slice())
        .map(|(entry, rate)| entry.amount / rate)
        .sum();

    let reference = &entries[0];
    Ok(TotalEntry {
        member_id: reference.member_id,
        currency_id: reference.currency_id,
        abbreviation: reference.abbreviation.clone(),
        amount,
    })
}

/// Applies [`combine`] to every member of a table, in member order.
pub fn combine_table(table: &TotalTable, rates: &ExchangeRates) -> Result<Vec<TotalEntry>> {
    table
        .member_ids()
        .iter()
        .map(|&member_id| combine(table.for_member(member_id), rates))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{sample_currency, sample_member};

    fn row(amounts: &[(i64, &str, f64)]) -> Vec<TotalEntry> {
        amounts
            .iter()
            .map(|&(currency_id, abbreviation, amount)| TotalEntry {
                member_id: 1,
                currency_id,
                abbreviation: abbreviation.to_string(),
                amount,
            })
            .collect()
    }

    #[test]
    fn test_parity_rates_sum_amounts() {
        let entries = row(&[(10, "SGD", 12.5), (11, "JPY", -4.0), (12, "EUR", 1.5)]);
        let combined = combine(&entries, &ExchangeRates::new(3)).unwrap();

        assert_eq!(combined.amount, 10.0);
        assert_eq!(combined.currency_id, 10);
        assert_eq!(combined.abbreviation, "SGD");
        assert_eq!(combined.member_id, 1);
    }

    #[test]
    fn test_rates_divide_foreign_amounts() {
        let entries = row(&[(10, "SGD", 10.0), (11, "JPY", 1100.0)]);
        let rates = ExchangeRates::from_rates(&[1.0, 110.0]).unwrap();
        let combined = combine(&entries, &rates).unwrap();
        assert!((combined.amount - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_count_mismatch() {
        let entries = row(&[(10, "SGD", 10.0)]);
        let result = combine(&entries, &ExchangeRates::new(2));
        assert!(matches!(
            result,
            Err(Error::RateCountMismatch {
                expected: 1,
                actual: 2
            })
        ));

        assert!(combine(&[], &ExchangeRates::new(0)).is_err());
    }

    #[test]
    fn test_set_rejects_invalid_rates() {
        let mut rates = ExchangeRates::new(2);
        assert!(matches!(rates.set(1, 0.0), Err(Error::InvalidRate { index: 1, .. })));
        assert!(matches!(rates.set(1, -3.0), Err(Error::InvalidRate { .. })));
        assert!(matches!(rates.set(1, f64::NAN), Err(Error::InvalidRate { .. })));
        assert!(matches!(rates.set(1, f64::INFINITY), Err(Error::InvalidRate { .. })));
        assert!(matches!(rates.set(5, 2.0), Err(Error::InvalidRate { index: 5, .. })));
        assert!(matches!(rates.set(0, 2.0), Err(Error::ReferenceRateFixed)));
        assert_eq!(rates.as_slice(), &[1.0, 1.0]);

        rates.set(1, 1.35).unwrap();
        assert_eq!(rates.as_slice(), &[1.0, 1.35]);
    }

    #[test]
    fn test_from_rates_pins_reference() {
        let rates = ExchangeRates::from_rates(&[7.0, 2.0]).unwrap();
        assert_eq!(rates.as_slice(), &[1.0, 2.0]);
        assert!(ExchangeRates::from_rates(&[1.0, 0.0]).is_err());
    }

    #[test]
    fn test_combine_table_per_member() {
        let members = vec![sample_member(1, "A"), sample_member(2, "B")];
        let currencies = vec![sample_currency(10, "SGD"), sample_currency(11, "JPY")];
        let mut table = TotalTable::zeroed(&members, &currencies);
        table.add(1, 10, 5.0);
        table.add(1, 11, 200.0);
        table.add(2, 11, -100.0);

        let rates = ExchangeRates::from_rates(&[1.0, 100.0]).unwrap();
        let combined = combine_table(&table, &rates).unwrap();

        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].member_id, 1);
        assert!((combined[0].amount - 7.0).abs() < 1e-9);
        assert_eq!(combined[1].member_id, 2);
        assert!((combined[1].amount + 1.0).abs() < 1e-9);
        assert!(combined.iter().all(|e| e.abbreviation == "SGD"));
    }
}
