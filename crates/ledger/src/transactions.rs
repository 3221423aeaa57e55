//! The module contains `Transaction` and its storage model.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Kind, LedgerError, ResultLedger};

/// A single income or expense movement.
///
/// The transaction is the source of truth; the payment method balance it
/// touches is a projection maintained by the effect engine. Every lifecycle
/// change (create, update, delete) goes through revert/apply of the stored
/// amount, never through direct balance writes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: Kind,
    /// Whole currency units, always positive.
    pub amount: i64,
    pub category_id: Uuid,
    pub subcategory_id: Uuid,
    pub payment_method_id: Uuid,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub amount: i64,
    pub category_id: Uuid,
    pub subcategory_id: Uuid,
    pub payment_method_id: Uuid,
    pub date: Date,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::subcategories::Entity",
        from = "Column::SubcategoryId",
        to = "super::subcategories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Subcategories,
    #[sea_orm(
        belongs_to = "super::payment_methods::Entity",
        from = "Column::PaymentMethodId",
        to = "super::payment_methods::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    PaymentMethods,
}

impl Related<super::subcategories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subcategories.def()
    }
}

impl Related<super::payment_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentMethods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(value: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            amount: ActiveValue::Set(value.amount),
            category_id: ActiveValue::Set(value.category_id),
            subcategory_id: ActiveValue::Set(value.subcategory_id),
            payment_method_id: ActiveValue::Set(value.payment_method_id),
            date: ActiveValue::Set(value.date),
            description: ActiveValue::Set(value.description.clone()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            kind: Kind::try_from(model.kind.as_str())?,
            amount: model.amount,
            category_id: model.category_id,
            subcategory_id: model.subcategory_id,
            payment_method_id: model.payment_method_id,
            date: model.date,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
