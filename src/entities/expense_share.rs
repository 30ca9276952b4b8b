//! Expense share entity - One member's proration weight for one expense.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense share database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_shares")]
pub struct Model {
    /// Unique identifier for the share row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Expense being divided
    pub expense_id: i64,
    /// Member carrying this share
    pub member_id: i64,
    /// Proration weight, relative to the other shares of the same expense
    pub share: f64,
}

/// Defines relationships between `ExpenseShare` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each share belongs to one expense
    #[sea_orm(
        belongs_to = "super::expense::Entity",
        from = "Column::ExpenseId",
        to = "super::expense::Column::Id"
    )]
    Expense,
    /// Each share belongs to one member
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id"
    )]
    Member,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
