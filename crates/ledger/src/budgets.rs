//! The module contains `Budget` and its storage model.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Month;

/// A planned spend ceiling for one expense subcategory in one calendar month.
///
/// Unique per `(user_id, year, month, subcategory_id)`; a missing row means a
/// zero budget, not an error. Upserts update `amount` in place, the row
/// identity never changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub subcategory_id: Uuid,
    /// Whole currency units.
    pub amount: i64,
}

impl Budget {
    pub fn new(user_id: Uuid, month: Month, subcategory_id: Uuid, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            year: month.year(),
            month: month.month() as i32,
            subcategory_id,
            amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub subcategory_id: Uuid,
    pub amount: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subcategories::Entity",
        from = "Column::SubcategoryId",
        to = "super::subcategories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Subcategories,
}

impl Related<super::subcategories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subcategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(value: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id),
            year: ActiveValue::Set(value.year),
            month: ActiveValue::Set(value.month),
            subcategory_id: ActiveValue::Set(value.subcategory_id),
            amount: ActiveValue::Set(value.amount),
        }
    }
}

impl From<Model> for Budget {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            year: model.year,
            month: model.month,
            subcategory_id: model.subcategory_id,
            amount: model.amount,
        }
    }
}
