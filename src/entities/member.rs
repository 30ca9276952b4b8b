//! Member entity - A person taking part in a trip.
//!
//! The `weight` column is only the default share offered when logging an expense;
//! settlement uses the per-expense shares stored in `expense_shares`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    /// Unique identifier for the member
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Default proration weight
    pub weight: f64,
    /// Trip this member belongs to
    pub trip_id: i64,
}

/// Defines relationships between Member and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each member belongs to one trip
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id"
    )]
    Trip,
    /// One member has many expense shares
    #[sea_orm(has_many = "super::expense_share::Entity")]
    ExpenseShares,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl Related<super::expense_share::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseShares.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
