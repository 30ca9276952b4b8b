//! Transaction entity - A direct settling payment between two members.
//!
//! Transactions are independent of expenses: the payer's balance rises by the
//! amount and the recipient's falls by the same amount, in the transaction's currency.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Trip this transaction belongs to
    pub trip_id: i64,
    /// Member handing over the money
    pub payer_id: i64,
    /// Member receiving the money
    pub recipient_id: i64,
    /// Amount transferred, always positive
    pub amount: f64,
    /// Currency of the transfer
    pub currency_id: i64,
    /// When the transfer happened
    pub date: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one trip
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id"
    )]
    Trip,
    /// Member paying
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::PayerId",
        to = "super::member::Column::Id",
        fk_name = "fk-transactions-payer"
    )]
    Payer,
    /// Member being paid
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::RecipientId",
        to = "super::member::Column::Id",
        fk_name = "fk-transactions-recipient"
    )]
    Recipient,
    /// Currency of the transfer
    #[sea_orm(
        belongs_to = "super::currency::Entity",
        from = "Column::CurrencyId",
        to = "super::currency::Column::Id"
    )]
    Currency,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
