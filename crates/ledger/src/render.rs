//! Rendering seam for expense reports.

use crate::ops::ExpenseReport;

/// Renders one monthly expense report into an output document.
///
/// The ledger hands implementations fully ordered data: rows ascending by
/// date and category totals descending by amount. Implementations format the
/// report, they never re-sort or re-aggregate it. A yearly workbook renders
/// the twelve monthly reports of [`Ledger::yearly_expense_reports`] one
/// section (or sheet) per month, in the order given.
///
/// [`Ledger::yearly_expense_reports`]: crate::Ledger::yearly_expense_reports
pub trait ReportRenderer {
    type Output;

    fn render(&self, report: &ExpenseReport) -> Self::Output;
}
