//! Transaction lifecycle.
//!
//! Create, update and delete each run as one database transaction covering
//! the record write and every balance effect, so a failed effect step rolls
//! the whole operation back. Update reverts the effect computed from the
//! pre-image and applies the one computed from the post-image; when the
//! payment method changes, the two effects target different rows.

use chrono::Utc;
use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Kind, LedgerError, Month, ResultLedger, TransactionCmd, TransactionPatch, money, transactions,
    transactions::Transaction,
};

use super::effects::{EffectDirection, apply_transaction_effect};
use super::payment_methods::require_payment_method;
use super::subcategories::{require_category, require_subcategory};
use super::{Ledger, normalize_optional_text, with_tx};

impl Ledger {
    pub async fn create_transaction(&self, cmd: TransactionCmd) -> ResultLedger<Transaction> {
        let amount = money::round_non_negative(cmd.amount)?;
        let description = normalize_optional_text(cmd.description.as_deref());

        with_tx!(self, |db_tx| {
            require_category(&db_tx, cmd.user_id, cmd.category_id, cmd.kind).await?;
            require_subcategory(
                &db_tx,
                cmd.user_id,
                cmd.subcategory_id,
                cmd.kind,
                Some(cmd.category_id),
            )
            .await?;
            require_payment_method(&db_tx, cmd.user_id, cmd.payment_method_id).await?;

            let now = Utc::now();
            let tx = Transaction {
                id: Uuid::new_v4(),
                user_id: cmd.user_id,
                kind: cmd.kind,
                amount,
                category_id: cmd.category_id,
                subcategory_id: cmd.subcategory_id,
                payment_method_id: cmd.payment_method_id,
                date: cmd.date,
                description,
                created_at: now,
                updated_at: now,
            };
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            apply_transaction_effect(&db_tx, &tx, EffectDirection::Apply).await?;

            tracing::debug!(transaction = %tx.id, user = %tx.user_id, "transaction created");
            Ok(tx)
        })
    }

    /// Updates a transaction, re-pointing its balance effect.
    ///
    /// The revert targets the payment method recorded in the pre-image and
    /// the apply targets the one in the post-image; editing
    /// `payment_method_id` therefore moves the amount between the two.
    pub async fn update_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        patch: TransactionPatch,
    ) -> ResultLedger<Transaction> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id)
                .filter(transactions::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("transaction".to_string()))?;
            let old = Transaction::try_from(model)?;

            let amount = match patch.amount {
                Some(amount) => money::round_non_negative(amount)?,
                None => old.amount,
            };
            let description = match patch.description {
                Some(ref text) => normalize_optional_text(Some(text)),
                None => old.description.clone(),
            };
            let new = Transaction {
                id: old.id,
                user_id: old.user_id,
                kind: patch.kind.unwrap_or(old.kind),
                amount,
                category_id: patch.category_id.unwrap_or(old.category_id),
                subcategory_id: patch.subcategory_id.unwrap_or(old.subcategory_id),
                payment_method_id: patch.payment_method_id.unwrap_or(old.payment_method_id),
                date: patch.date.unwrap_or(old.date),
                description,
                created_at: old.created_at,
                updated_at: Utc::now(),
            };

            require_category(&db_tx, user_id, new.category_id, new.kind).await?;
            require_subcategory(
                &db_tx,
                user_id,
                new.subcategory_id,
                new.kind,
                Some(new.category_id),
            )
            .await?;
            require_payment_method(&db_tx, user_id, new.payment_method_id).await?;

            // Revert first: applying the new effect before undoing the old one
            // would double-count on the shared payment method.
            apply_transaction_effect(&db_tx, &old, EffectDirection::Revert).await?;
            transactions::ActiveModel::from(&new).update(&db_tx).await?;
            apply_transaction_effect(&db_tx, &new, EffectDirection::Apply).await?;

            tracing::debug!(transaction = %new.id, user = %user_id, "transaction updated");
            Ok(new)
        })
    }

    pub async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id)
                .filter(transactions::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("transaction".to_string()))?;
            let tx = Transaction::try_from(model)?;

            apply_transaction_effect(&db_tx, &tx, EffectDirection::Revert).await?;
            transactions::Entity::delete_by_id(transaction_id)
                .exec(&db_tx)
                .await?;

            tracing::debug!(transaction = %transaction_id, user = %user_id, "transaction deleted");
            Ok(())
        })
    }

    pub async fn transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultLedger<Transaction> {
        let model = transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::NotFound("transaction".to_string()))?;
        Transaction::try_from(model)
    }

    /// Lists one month of the user's transactions of one kind, newest first.
    pub async fn transactions(
        &self,
        user_id: Uuid,
        kind: Kind,
        month: Month,
    ) -> ResultLedger<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::Kind.eq(kind.as_str()))
            .filter(transactions::Column::Date.gte(month.start()))
            .filter(transactions::Column::Date.lt(month.end_exclusive()))
            .order_by_desc(transactions::Column::Date)
            .all(&self.database)
            .await?;
        models.into_iter().map(Transaction::try_from).collect()
    }
}
