//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each table is scoped to a trip, either directly or through its expense.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod currency;
pub mod expense;
pub mod expense_share;
pub mod member;
pub mod transaction;
pub mod trip;

// Re-export specific types to avoid conflicts
pub use currency::{Column as CurrencyColumn, Entity as Currency, Model as CurrencyModel};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use expense_share::{
    Column as ExpenseShareColumn, Entity as ExpenseShare, Model as ExpenseShareModel,
};
pub use member::{Column as MemberColumn, Entity as Member, Model as MemberModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use trip::{Column as TripColumn, Entity as Trip, Model as TripModel};
