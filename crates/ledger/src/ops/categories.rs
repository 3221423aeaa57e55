use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{Category, Kind, LedgerError, ResultLedger, categories, subcategories};

use super::{Ledger, normalize_required_name, with_tx};

impl Ledger {
    pub async fn new_category(
        &self,
        user_id: Uuid,
        kind: Kind,
        name: &str,
    ) -> ResultLedger<Category> {
        let name = normalize_required_name(name, "category")?;
        let category = Category::new(user_id, kind, name, Utc::now());
        categories::ActiveModel::from(&category)
            .insert(&self.database)
            .await?;
        Ok(category)
    }

    /// Lists the user's categories of one kind, sorted by name.
    pub async fn categories(&self, user_id: Uuid, kind: Kind) -> ResultLedger<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(categories::Column::Kind.eq(kind.as_str()))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Category::try_from).collect()
    }

    pub async fn rename_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        new_name: &str,
    ) -> ResultLedger<Category> {
        let new_name = normalize_required_name(new_name, "category")?;
        with_tx!(self, |db_tx| {
            let model = categories::Entity::find_by_id(category_id)
                .filter(categories::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("category".to_string()))?;

            let active = categories::ActiveModel {
                id: ActiveValue::Set(model.id),
                name: ActiveValue::Set(new_name),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;
            Category::try_from(updated)
        })
    }

    /// Deletes a category. Its subcategories must be removed first.
    pub async fn delete_category(&self, user_id: Uuid, category_id: Uuid) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let sub_refs = subcategories::Entity::find()
                .filter(subcategories::Column::UserId.eq(user_id))
                .filter(subcategories::Column::CategoryId.eq(category_id))
                .count(&db_tx)
                .await?;
            if sub_refs > 0 {
                return Err(LedgerError::Conflict(
                    "category still has subcategories".to_string(),
                ));
            }

            let result = categories::Entity::delete_by_id(category_id)
                .filter(categories::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(LedgerError::NotFound("category".to_string()));
            }
            Ok(())
        })
    }
}
