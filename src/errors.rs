//! Unified error types for Splitzy.
//!
//! Storage and validation failures surface through [`Error`]. The settlement
//! calculator itself never fails; malformed rows are skipped and logged.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed, or an input field is malformed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Underlying `SeaORM` failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Amount is zero, negative, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Expense shares are unusable (negative, non-finite, or summing to zero)
    #[error("Invalid shares: {reason}")]
    InvalidShares {
        /// Why the shares were rejected
        reason: String,
    },

    /// Exchange rate is zero, negative, or not finite
    #[error("Invalid exchange rate {rate} for currency at position {index}")]
    InvalidRate {
        /// Position of the currency in the trip's currency list
        index: usize,
        /// The rejected rate
        rate: f64,
    },

    /// The reference currency's rate is fixed at 1
    #[error("The reference currency rate cannot be changed")]
    ReferenceRateFixed,

    /// Rates and entries are not index-aligned
    #[error("Expected {expected} exchange rates, got {actual}")]
    RateCountMismatch {
        /// Number of per-currency entries
        expected: usize,
        /// Number of rates supplied
        actual: usize,
    },

    /// Trip start date falls after its end date
    #[error("Trip start date must not be after its end date")]
    InvalidDateRange,

    /// Payer and recipient of a transaction are the same member
    #[error("Member {id} cannot pay themselves")]
    SameMember {
        /// The member on both sides
        id: i64,
    },

    /// Trip not found
    #[error("Trip not found: {id}")]
    TripNotFound {
        /// Requested trip id
        id: i64,
    },

    /// Member not found, or not part of the trip
    #[error("Member not found: {id}")]
    MemberNotFound {
        /// Requested member id
        id: i64,
    },

    /// Currency not found, or not part of the trip
    #[error("Currency not found: {id}")]
    CurrencyNotFound {
        /// Requested currency id
        id: i64,
    },

    /// Expense not found
    #[error("Expense not found: {id}")]
    ExpenseNotFound {
        /// Requested expense id
        id: i64,
    },

    /// Transaction not found
    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// Requested transaction id
        id: i64,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
