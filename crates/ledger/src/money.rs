//! Whole-unit money handling.
//!
//! Every monetary value in the ledger is a **signed integer number of whole
//! currency units** (`i64`). There are no fractional subunits: amounts
//! crossing the API boundary as floats are rounded exactly once, here, and
//! all arithmetic after that point is integer arithmetic. This keeps
//! apply/revert cycles on balances exact, with no floating-point drift.

use crate::{LedgerError, ResultLedger};

/// Largest absolute amount accepted at the boundary.
///
/// Stays far below `i64::MAX` so balance increments can never overflow even
/// after an unreasonable number of operations.
const MAX_AMOUNT: f64 = 1e15;

/// Rounds a boundary amount to whole currency units (half away from zero).
///
/// Rejects non-finite values and values outside the supported range.
///
/// # Examples
///
/// ```rust
/// use ledger::money::round_to_unit;
///
/// assert_eq!(round_to_unit(10_000.4).unwrap(), 10_000);
/// assert_eq!(round_to_unit(10_000.5).unwrap(), 10_001);
/// assert_eq!(round_to_unit(-2.5).unwrap(), -3);
/// assert!(round_to_unit(f64::NAN).is_err());
/// ```
pub fn round_to_unit(value: f64) -> ResultLedger<i64> {
    if !value.is_finite() {
        return Err(LedgerError::Validation(
            "amount must be a finite number".to_string(),
        ));
    }
    if value.abs() > MAX_AMOUNT {
        return Err(LedgerError::Validation("amount too large".to_string()));
    }
    Ok(value.round() as i64)
}

/// Rounds a boundary amount and rejects negative results.
///
/// Transaction and transfer amounts are stored non-negative; the sign is
/// implied by the record kind.
pub fn round_non_negative(value: f64) -> ResultLedger<i64> {
    let units = round_to_unit(value)?;
    if units < 0 {
        return Err(LedgerError::Validation(
            "amount must be >= 0".to_string(),
        ));
    }
    Ok(units)
}
