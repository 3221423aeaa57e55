//! The module contains `Subcategory` and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Kind, LedgerError, ResultLedger};

/// A subcategory.
///
/// The leaf grouping transactions are recorded under. Its `kind` always
/// matches the parent category's kind; budgets are keyed on expense
/// subcategories.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: Kind,
    pub category_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Subcategory {
    pub fn new(
        user_id: Uuid,
        kind: Kind,
        category_id: Uuid,
        name: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            category_id,
            name,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subcategories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub category_id: Uuid,
    pub name: String,
    pub created_at: DateTimeUtc,
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
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Subcategory> for ActiveModel {
    fn from(value: &Subcategory) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            category_id: ActiveValue::Set(value.category_id),
            name: ActiveValue::Set(value.name.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Subcategory {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            kind: Kind::try_from(model.kind.as_str())?,
            category_id: model.category_id,
            name: model.name,
            created_at: model.created_at,
        })
    }
}
