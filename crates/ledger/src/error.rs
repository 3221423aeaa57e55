//! The module contains the error the ledger can throw.
//!
//! The variants map one-to-one onto the failure taxonomy the request layer
//! needs to distinguish:
//!
//! - [`Validation`] for malformed input and invariant violations,
//! - [`NotFound`] for absent or not-owned referenced entities,
//! - [`Conflict`] for deletes blocked by dependent records,
//! - [`ConsistencyFault`] for an effect step failing after a preceding one
//!   succeeded.
//!
//! [`Validation`]: LedgerError::Validation
//! [`NotFound`]: LedgerError::NotFound
//! [`Conflict`]: LedgerError::Conflict
//! [`ConsistencyFault`]: LedgerError::ConsistencyFault
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::ops::EffectDirection;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Consistency fault: {direction} effect on payment method {target} failed for record {record}")]
    ConsistencyFault {
        record: Uuid,
        direction: EffectDirection,
        target: Uuid,
    },
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (
                Self::ConsistencyFault {
                    record: ra,
                    direction: da,
                    target: ta,
                },
                Self::ConsistencyFault {
                    record: rb,
                    direction: db,
                    target: tb,
                },
            ) => ra == rb && da == db && ta == tb,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
