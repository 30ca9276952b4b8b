//! Expense entity - A payment made by one member on behalf of the group.
//!
//! How the cost is divided lives in the `expense_shares` child table, one row per
//! member. Resolved expenses still count towards paid and personal totals but no
//! longer affect outstanding balances.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Trip this expense belongs to
    pub trip_id: i64,
    /// Short description (e.g., "Dinner")
    pub name: String,
    /// Member who paid the full amount
    pub payer_id: i64,
    /// Total amount paid, always positive
    pub amount: f64,
    /// Currency the amount is denominated in
    pub currency_id: i64,
    /// When the expense happened
    pub date: DateTimeUtc,
    /// Whether the expense has been settled outside the app
    pub is_resolved: bool,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one trip
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id"
    )]
    Trip,
    /// Each expense has one payer
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::PayerId",
        to = "super::member::Column::Id"
    )]
    Payer,
    /// Each expense is in one currency
    #[sea_orm(
        belongs_to = "super::currency::Entity",
        from = "Column::CurrencyId",
        to = "super::currency::Column::Id"
    )]
    Currency,
    /// One expense has many shares
    #[sea_orm(has_many = "super::expense_share::Entity")]
    Shares,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl Related<super::currency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Currency.def()
    }
}

impl Related<super::expense_share::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shares.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
