//! Trip entity - The top-level grouping for members, currencies, expenses and transactions.
//!
//! Every other table is scoped to a trip through its `trip_id` column.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Trip database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    /// Unique identifier for the trip
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the trip (e.g., "Tokyo 2026")
    pub name: String,
    /// Free-text destination
    pub location: String,
    /// First day of the trip
    pub start_date: Date,
    /// Last day of the trip
    pub end_date: Date,
}

/// Defines relationships between Trip and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One trip has many members
    #[sea_orm(has_many = "super::member::Entity")]
    Members,
    /// One trip has many currencies
    #[sea_orm(has_many = "super::currency::Entity")]
    Currencies,
    /// One trip has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    /// One trip has many settling transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::currency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Currencies.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
