//! The effect engine.
//!
//! An effect is the signed balance delta a transaction or transfer causes on
//! the payment methods it references. Applying and reverting are exact
//! inverses: the delta functions are pure, and the store write is a single
//! atomic increment per payment method, never a full-row rewrite.
//!
//! This module is the only writer of `payment_methods.balance` after
//! creation.

use std::fmt;

use sea_orm::{ConnectionTrait, QueryFilter, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    Kind, LedgerError, ResultLedger, payment_methods, transactions::Transaction,
    transfers::Transfer,
};

/// Whether an effect is being applied forward or undone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectDirection {
    Apply,
    Revert,
}

impl EffectDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Revert => "revert",
        }
    }
}

impl fmt::Display for EffectDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Balance delta of a transaction on its payment method.
pub(super) fn transaction_delta(kind: Kind, amount: i64, direction: EffectDirection) -> i64 {
    let delta = match kind {
        Kind::Income => amount,
        Kind::Expense => -amount,
    };
    match direction {
        EffectDirection::Apply => delta,
        EffectDirection::Revert => -delta,
    }
}

/// Balance deltas of a transfer: `(source, destination)`.
pub(super) fn transfer_deltas(amount: i64, direction: EffectDirection) -> (i64, i64) {
    match direction {
        EffectDirection::Apply => (-amount, amount),
        EffectDirection::Revert => (amount, -amount),
    }
}

/// Increments one payment method balance by `delta`, atomically at the store
/// level.
pub(super) async fn adjust_balance<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    payment_method_id: Uuid,
    delta: i64,
) -> ResultLedger<()> {
    let result = payment_methods::Entity::update_many()
        .col_expr(
            payment_methods::Column::Balance,
            Expr::col(payment_methods::Column::Balance).add(delta),
        )
        .filter(payment_methods::Column::Id.eq(payment_method_id))
        .filter(payment_methods::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(LedgerError::NotFound("payment method".to_string()));
    }
    Ok(())
}

pub(super) async fn apply_transaction_effect<C: ConnectionTrait>(
    conn: &C,
    tx: &Transaction,
    direction: EffectDirection,
) -> ResultLedger<()> {
    let delta = transaction_delta(tx.kind, tx.amount, direction);
    adjust_balance(conn, tx.user_id, tx.payment_method_id, delta)
        .await
        .map_err(|err| effect_fault(err, tx.id, direction, tx.payment_method_id))
}

pub(super) async fn apply_transfer_effect<C: ConnectionTrait>(
    conn: &C,
    transfer: &Transfer,
    direction: EffectDirection,
) -> ResultLedger<()> {
    let (from_delta, to_delta) = transfer_deltas(transfer.amount, direction);
    adjust_balance(
        conn,
        transfer.user_id,
        transfer.from_payment_method_id,
        from_delta,
    )
    .await
    .map_err(|err| effect_fault(err, transfer.id, direction, transfer.from_payment_method_id))?;
    adjust_balance(
        conn,
        transfer.user_id,
        transfer.to_payment_method_id,
        to_delta,
    )
    .await
    .map_err(|err| effect_fault(err, transfer.id, direction, transfer.to_payment_method_id))
}

/// Every effect target is validated before the first write of a lifecycle
/// operation, so a missed increment here means the payment method vanished
/// mid-operation. The surrounding transaction rolls back; the log keeps
/// enough context for manual reconciliation.
fn effect_fault(
    err: LedgerError,
    record: Uuid,
    direction: EffectDirection,
    target: Uuid,
) -> LedgerError {
    match err {
        LedgerError::NotFound(_) => {
            tracing::error!(%record, %direction, %target, "effect step hit a missing payment method");
            LedgerError::ConsistencyFault {
                record,
                direction,
                target,
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_and_expense_deltas_are_signed_by_kind() {
        assert_eq!(
            transaction_delta(Kind::Income, 1_000_000, EffectDirection::Apply),
            1_000_000
        );
        assert_eq!(
            transaction_delta(Kind::Expense, 50_000, EffectDirection::Apply),
            -50_000
        );
    }

    #[test]
    fn revert_negates_the_applied_delta() {
        for kind in [Kind::Income, Kind::Expense] {
            let applied = transaction_delta(kind, 75_000, EffectDirection::Apply);
            let reverted = transaction_delta(kind, 75_000, EffectDirection::Revert);
            assert_eq!(applied + reverted, 0);
        }
    }

    #[test]
    fn transfer_legs_are_symmetric() {
        let (from, to) = transfer_deltas(100_000, EffectDirection::Apply);
        assert_eq!(from, -100_000);
        assert_eq!(to, 100_000);

        let (from_back, to_back) = transfer_deltas(100_000, EffectDirection::Revert);
        assert_eq!(from + from_back, 0);
        assert_eq!(to + to_back, 0);
    }

    #[test]
    fn direction_formats_as_lowercase() {
        assert_eq!(EffectDirection::Apply.to_string(), "apply");
        assert_eq!(EffectDirection::Revert.to_string(), "revert");
    }
}
