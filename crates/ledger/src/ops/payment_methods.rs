use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    LedgerError, PaymentMethod, ResultLedger, money, payment_methods, transactions, transfers,
};

use super::{Ledger, normalize_required_name, with_tx};

impl Ledger {
    /// Creates a payment method with an opening balance.
    ///
    /// The opening balance is the only balance write that does not go through
    /// the effect engine; every later change does.
    pub async fn new_payment_method(
        &self,
        user_id: Uuid,
        name: &str,
        opening_balance: f64,
    ) -> ResultLedger<PaymentMethod> {
        let name = normalize_required_name(name, "payment method")?;
        let balance = money::round_to_unit(opening_balance)?;

        let method = PaymentMethod::new(user_id, name, balance, Utc::now());
        payment_methods::ActiveModel::from(&method)
            .insert(&self.database)
            .await?;
        Ok(method)
    }

    /// Lists the user's payment methods, sorted by name.
    pub async fn payment_methods(&self, user_id: Uuid) -> ResultLedger<Vec<PaymentMethod>> {
        let models = payment_methods::Entity::find()
            .filter(payment_methods::Column::UserId.eq(user_id))
            .order_by_asc(payment_methods::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(PaymentMethod::from).collect())
    }

    pub async fn payment_method(
        &self,
        user_id: Uuid,
        payment_method_id: Uuid,
    ) -> ResultLedger<PaymentMethod> {
        let model = payment_methods::Entity::find_by_id(payment_method_id)
            .filter(payment_methods::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::NotFound("payment method".to_string()))?;
        Ok(PaymentMethod::from(model))
    }

    /// Renames a payment method.
    ///
    /// The balance is deliberately not updatable here; only the effect engine
    /// writes it after creation.
    pub async fn rename_payment_method(
        &self,
        user_id: Uuid,
        payment_method_id: Uuid,
        new_name: &str,
    ) -> ResultLedger<PaymentMethod> {
        let new_name = normalize_required_name(new_name, "payment method")?;
        with_tx!(self, |db_tx| {
            let model = payment_methods::Entity::find_by_id(payment_method_id)
                .filter(payment_methods::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("payment method".to_string()))?;

            let active = payment_methods::ActiveModel {
                id: ActiveValue::Set(model.id),
                name: ActiveValue::Set(new_name),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;
            Ok(PaymentMethod::from(updated))
        })
    }

    /// Deletes a payment method, unless a transaction or transfer still
    /// references it.
    pub async fn delete_payment_method(
        &self,
        user_id: Uuid,
        payment_method_id: Uuid,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let tx_refs = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::PaymentMethodId.eq(payment_method_id))
                .count(&db_tx)
                .await?;
            let transfer_refs = transfers::Entity::find()
                .filter(transfers::Column::UserId.eq(user_id))
                .filter(
                    transfers::Column::FromPaymentMethodId
                        .eq(payment_method_id)
                        .or(transfers::Column::ToPaymentMethodId.eq(payment_method_id)),
                )
                .count(&db_tx)
                .await?;
            if tx_refs > 0 || transfer_refs > 0 {
                return Err(LedgerError::Conflict(
                    "payment method is still referenced by transactions or transfers".to_string(),
                ));
            }

            let result = payment_methods::Entity::delete_by_id(payment_method_id)
                .filter(payment_methods::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(LedgerError::NotFound("payment method".to_string()));
            }
            Ok(())
        })
    }
}

/// The payment method must exist and belong to the user.
pub(super) async fn require_payment_method<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    payment_method_id: Uuid,
) -> ResultLedger<payment_methods::Model> {
    payment_methods::Entity::find_by_id(payment_method_id)
        .filter(payment_methods::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or_else(|| LedgerError::NotFound("payment method".to_string()))
}
