//! Core business logic - framework-agnostic settlement and trip storage operations.
//!
//! [`settlement`], [`totals`] and [`normalizer`] are pure and synchronous. The
//! remaining modules are async storage operations over `SeaORM` that validate
//! input before it can reach the calculator.

/// Currency management within a trip
pub mod currency;
/// Expense logging and the share-map input adapter
pub mod expense;
/// Member management within a trip
pub mod member;
/// Reference-currency aggregation of totals
pub mod normalizer;
/// Overview generation and display formatting
pub mod report;
/// The settlement calculator
pub mod settlement;
/// Settling payments between members
pub mod transaction;
/// Dense per-member, per-currency result tables
pub mod totals;
/// Trip creation, search and deletion
pub mod trip;
