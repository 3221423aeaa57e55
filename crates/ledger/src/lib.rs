//! The personal finance ledger core.
//!
//! Tracks income, expenses and transfers between payment methods for many
//! independent users, keeping each payment method's balance consistent with
//! the records referencing it and deriving budget, report and dashboard views
//! on demand. [`Ledger`] is the entry point; it owns the database connection
//! and exposes every operation as an async method scoped by `user_id`.

pub use budgets::Budget;
pub use categories::{Category, Kind};
pub use commands::{BudgetItem, TransactionCmd, TransactionPatch, TransferCmd, TransferPatch};
pub use error::LedgerError;
pub use ops::{
    BudgetRow, CategoryTotal, DailyPoint, DashboardOverview, EffectDirection, ExpenseReport,
    Ledger, LedgerBuilder, ReportRow,
};
pub use payment_methods::PaymentMethod;
pub use period::Month;
pub use render::ReportRenderer;
pub use subcategories::Subcategory;
pub use transactions::Transaction;
pub use transfers::Transfer;

pub mod budgets;
pub mod categories;
pub mod commands;
mod error;
pub mod money;
mod ops;
pub mod payment_methods;
mod period;
pub mod render;
pub mod subcategories;
pub mod transactions;
pub mod transfers;

pub type ResultLedger<T> = Result<T, LedgerError>;
