//! Transfer lifecycle.
//!
//! Same shape as the transaction lifecycle, except every operation touches
//! two payment methods: the source is debited and the destination credited
//! by the same amount, so a transfer never changes the user's net worth.

use chrono::Utc;
use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    LedgerError, Month, ResultLedger, TransferCmd, TransferPatch, money, transfers,
    transfers::Transfer,
};

use super::effects::{EffectDirection, apply_transfer_effect};
use super::payment_methods::require_payment_method;
use super::{Ledger, normalize_optional_text, with_tx};

impl Ledger {
    pub async fn create_transfer(&self, cmd: TransferCmd) -> ResultLedger<Transfer> {
        let amount = money::round_non_negative(cmd.amount)?;
        if cmd.from_payment_method_id == cmd.to_payment_method_id {
            return Err(LedgerError::Validation(
                "source and destination payment methods must differ".to_string(),
            ));
        }
        let description = normalize_optional_text(cmd.description.as_deref());

        with_tx!(self, |db_tx| {
            require_payment_method(&db_tx, cmd.user_id, cmd.from_payment_method_id).await?;
            require_payment_method(&db_tx, cmd.user_id, cmd.to_payment_method_id).await?;

            let now = Utc::now();
            let transfer = Transfer {
                id: Uuid::new_v4(),
                user_id: cmd.user_id,
                amount,
                from_payment_method_id: cmd.from_payment_method_id,
                to_payment_method_id: cmd.to_payment_method_id,
                date: cmd.date,
                description,
                created_at: now,
                updated_at: now,
            };
            transfers::ActiveModel::from(&transfer)
                .insert(&db_tx)
                .await?;
            apply_transfer_effect(&db_tx, &transfer, EffectDirection::Apply).await?;

            tracing::debug!(transfer = %transfer.id, user = %transfer.user_id, "transfer created");
            Ok(transfer)
        })
    }

    pub async fn update_transfer(
        &self,
        user_id: Uuid,
        transfer_id: Uuid,
        patch: TransferPatch,
    ) -> ResultLedger<Transfer> {
        with_tx!(self, |db_tx| {
            let model = transfers::Entity::find_by_id(transfer_id)
                .filter(transfers::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("transfer".to_string()))?;
            let old = Transfer::from(model);

            let amount = match patch.amount {
                Some(amount) => money::round_non_negative(amount)?,
                None => old.amount,
            };
            let description = match patch.description {
                Some(ref text) => normalize_optional_text(Some(text)),
                None => old.description.clone(),
            };
            let new = Transfer {
                id: old.id,
                user_id: old.user_id,
                amount,
                from_payment_method_id: patch
                    .from_payment_method_id
                    .unwrap_or(old.from_payment_method_id),
                to_payment_method_id: patch
                    .to_payment_method_id
                    .unwrap_or(old.to_payment_method_id),
                date: patch.date.unwrap_or(old.date),
                description,
                created_at: old.created_at,
                updated_at: Utc::now(),
            };
            if new.from_payment_method_id == new.to_payment_method_id {
                return Err(LedgerError::Validation(
                    "source and destination payment methods must differ".to_string(),
                ));
            }
            require_payment_method(&db_tx, user_id, new.from_payment_method_id).await?;
            require_payment_method(&db_tx, user_id, new.to_payment_method_id).await?;

            apply_transfer_effect(&db_tx, &old, EffectDirection::Revert).await?;
            transfers::ActiveModel::from(&new).update(&db_tx).await?;
            apply_transfer_effect(&db_tx, &new, EffectDirection::Apply).await?;

            tracing::debug!(transfer = %new.id, user = %user_id, "transfer updated");
            Ok(new)
        })
    }

    pub async fn delete_transfer(&self, user_id: Uuid, transfer_id: Uuid) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let model = transfers::Entity::find_by_id(transfer_id)
                .filter(transfers::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("transfer".to_string()))?;
            let transfer = Transfer::from(model);

            apply_transfer_effect(&db_tx, &transfer, EffectDirection::Revert).await?;
            transfers::Entity::delete_by_id(transfer_id)
                .exec(&db_tx)
                .await?;

            tracing::debug!(transfer = %transfer_id, user = %user_id, "transfer deleted");
            Ok(())
        })
    }

    pub async fn transfer(&self, user_id: Uuid, transfer_id: Uuid) -> ResultLedger<Transfer> {
        let model = transfers::Entity::find_by_id(transfer_id)
            .filter(transfers::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::NotFound("transfer".to_string()))?;
        Ok(Transfer::from(model))
    }

    /// Lists one month of the user's transfers, newest first.
    pub async fn transfers(&self, user_id: Uuid, month: Month) -> ResultLedger<Vec<Transfer>> {
        let models = transfers::Entity::find()
            .filter(transfers::Column::UserId.eq(user_id))
            .filter(transfers::Column::Date.gte(month.start()))
            .filter(transfers::Column::Date.lt(month.end_exclusive()))
            .order_by_desc(transfers::Column::Date)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Transfer::from).collect())
    }
}
