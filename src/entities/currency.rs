//! Currency entity - A currency used within one trip.
//!
//! Currency identity is trip-scoped. The currency with the lowest id in a trip is
//! its reference currency for combined balances.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Currency database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "currencies")]
pub struct Model {
    /// Unique identifier for the currency
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name (e.g., "Japanese Yen")
    pub name: String,
    /// Short code shown next to amounts (e.g., "JPY")
    pub abbreviation: String,
    /// Trip this currency belongs to
    pub trip_id: i64,
}

/// Defines relationships between Currency and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each currency belongs to one trip
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id"
    )]
    Trip,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
