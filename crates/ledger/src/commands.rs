//! Command structs for ledger operations.
//!
//! These types group parameters for write operations
//! (transactions/transfers/budgets), keeping call sites readable and avoiding
//! long argument lists. Amounts arrive as `f64` and are rounded to whole
//! currency units exactly once, at the boundary (see `money`).

use chrono::NaiveDate;
use uuid::Uuid;

use crate::Kind;

/// Create an income or expense transaction.
#[derive(Clone, Debug)]
pub struct TransactionCmd {
    pub user_id: Uuid,
    pub kind: Kind,
    pub amount: f64,
    pub category_id: Uuid,
    pub subcategory_id: Uuid,
    pub payment_method_id: Uuid,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl TransactionCmd {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        kind: Kind,
        amount: f64,
        category_id: Uuid,
        subcategory_id: Uuid,
        payment_method_id: Uuid,
        date: NaiveDate,
    ) -> Self {
        Self {
            user_id,
            kind,
            amount,
            category_id,
            subcategory_id,
            payment_method_id,
            date,
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Update an existing transaction. `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
    pub kind: Option<Kind>,
    pub amount: Option<f64>,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub payment_method_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl TransactionPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn subcategory_id(mut self, subcategory_id: Uuid) -> Self {
        self.subcategory_id = Some(subcategory_id);
        self
    }

    #[must_use]
    pub fn payment_method_id(mut self, payment_method_id: Uuid) -> Self {
        self.payment_method_id = Some(payment_method_id);
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Create a transfer between two payment methods.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub user_id: Uuid,
    pub amount: f64,
    pub from_payment_method_id: Uuid,
    pub to_payment_method_id: Uuid,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl TransferCmd {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        amount: f64,
        from_payment_method_id: Uuid,
        to_payment_method_id: Uuid,
        date: NaiveDate,
    ) -> Self {
        Self {
            user_id,
            amount,
            from_payment_method_id,
            to_payment_method_id,
            date,
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Update an existing transfer. `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct TransferPatch {
    pub amount: Option<f64>,
    pub from_payment_method_id: Option<Uuid>,
    pub to_payment_method_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl TransferPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn from_payment_method_id(mut self, payment_method_id: Uuid) -> Self {
        self.from_payment_method_id = Some(payment_method_id);
        self
    }

    #[must_use]
    pub fn to_payment_method_id(mut self, payment_method_id: Uuid) -> Self {
        self.to_payment_method_id = Some(payment_method_id);
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One subcategory's planned amount inside a budget upsert.
#[derive(Clone, Debug)]
pub struct BudgetItem {
    pub subcategory_id: Uuid,
    pub amount: f64,
}

impl BudgetItem {
    #[must_use]
    pub fn new(subcategory_id: Uuid, amount: f64) -> Self {
        Self {
            subcategory_id,
            amount,
        }
    }
}
