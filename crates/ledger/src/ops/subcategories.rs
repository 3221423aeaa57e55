use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Kind, LedgerError, ResultLedger, Subcategory, budgets, categories, subcategories, transactions,
};

use super::{Ledger, normalize_required_name, with_tx};

impl Ledger {
    /// Creates a subcategory under an existing category of the same kind.
    pub async fn new_subcategory(
        &self,
        user_id: Uuid,
        kind: Kind,
        category_id: Uuid,
        name: &str,
    ) -> ResultLedger<Subcategory> {
        let name = normalize_required_name(name, "subcategory")?;
        with_tx!(self, |db_tx| {
            require_category(&db_tx, user_id, category_id, kind).await?;

            let subcategory = Subcategory::new(user_id, kind, category_id, name, Utc::now());
            subcategories::ActiveModel::from(&subcategory)
                .insert(&db_tx)
                .await?;
            Ok(subcategory)
        })
    }

    /// Lists the user's subcategories of one kind, optionally narrowed to a
    /// category, sorted by name.
    pub async fn subcategories(
        &self,
        user_id: Uuid,
        kind: Kind,
        category_id: Option<Uuid>,
    ) -> ResultLedger<Vec<Subcategory>> {
        let mut query = subcategories::Entity::find()
            .filter(subcategories::Column::UserId.eq(user_id))
            .filter(subcategories::Column::Kind.eq(kind.as_str()));
        if let Some(category_id) = category_id {
            query = query.filter(subcategories::Column::CategoryId.eq(category_id));
        }
        let models = query
            .order_by_asc(subcategories::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Subcategory::try_from).collect()
    }

    /// Updates a subcategory's name and parent category. The new parent must
    /// carry the same kind.
    pub async fn update_subcategory(
        &self,
        user_id: Uuid,
        subcategory_id: Uuid,
        category_id: Uuid,
        new_name: &str,
    ) -> ResultLedger<Subcategory> {
        let new_name = normalize_required_name(new_name, "subcategory")?;
        with_tx!(self, |db_tx| {
            let model = subcategories::Entity::find_by_id(subcategory_id)
                .filter(subcategories::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("subcategory".to_string()))?;
            let kind = Kind::try_from(model.kind.as_str())?;

            require_category(&db_tx, user_id, category_id, kind).await?;

            let active = subcategories::ActiveModel {
                id: ActiveValue::Set(model.id),
                category_id: ActiveValue::Set(category_id),
                name: ActiveValue::Set(new_name),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;
            Subcategory::try_from(updated)
        })
    }

    /// Deletes a subcategory, unless a transaction still references it.
    /// Its budget rows (all months) are removed in the same operation.
    pub async fn delete_subcategory(
        &self,
        user_id: Uuid,
        subcategory_id: Uuid,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let tx_refs = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::SubcategoryId.eq(subcategory_id))
                .count(&db_tx)
                .await?;
            if tx_refs > 0 {
                return Err(LedgerError::Conflict(
                    "subcategory is still referenced by transactions".to_string(),
                ));
            }

            budgets::Entity::delete_many()
                .filter(budgets::Column::UserId.eq(user_id))
                .filter(budgets::Column::SubcategoryId.eq(subcategory_id))
                .exec(&db_tx)
                .await?;

            let result = subcategories::Entity::delete_by_id(subcategory_id)
                .filter(subcategories::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(LedgerError::NotFound("subcategory".to_string()));
            }
            Ok(())
        })
    }
}

/// The category must exist, belong to the user and carry the expected kind.
/// A category of the wrong kind is an invariant violation, not a missing row.
pub(super) async fn require_category<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    category_id: Uuid,
    kind: Kind,
) -> ResultLedger<categories::Model> {
    let model = categories::Entity::find_by_id(category_id)
        .filter(categories::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or_else(|| LedgerError::NotFound("category".to_string()))?;
    if model.kind != kind.as_str() {
        return Err(LedgerError::Validation(format!(
            "category kind must be {kind}",
            kind = kind.as_str()
        )));
    }
    Ok(model)
}

/// The subcategory must exist, belong to the user, carry the expected kind
/// and (when given) hang off the expected parent category.
pub(super) async fn require_subcategory<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    subcategory_id: Uuid,
    kind: Kind,
    category_id: Option<Uuid>,
) -> ResultLedger<subcategories::Model> {
    let model = subcategories::Entity::find_by_id(subcategory_id)
        .filter(subcategories::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or_else(|| LedgerError::NotFound("subcategory".to_string()))?;
    if model.kind != kind.as_str() {
        return Err(LedgerError::Validation(format!(
            "subcategory kind must be {kind}",
            kind = kind.as_str()
        )));
    }
    if let Some(category_id) = category_id
        && model.category_id != category_id
    {
        return Err(LedgerError::Validation(
            "subcategory does not belong to the given category".to_string(),
        ));
    }
    Ok(model)
}
