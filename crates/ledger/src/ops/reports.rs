//! The expense report aggregator.
//!
//! Produces the denormalized data the document renderer consumes: one line
//! per expense transaction with category, subcategory and payment method
//! names resolved through lookup maps built once per call, plus per-category
//! totals.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{Kind, Month, ResultLedger, categories, payment_methods, subcategories, transactions};

use super::Ledger;

/// One expense line, fully denormalized for rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub transaction_id: Uuid,
    pub date: NaiveDate,
    pub category_id: Uuid,
    pub category_name: String,
    pub subcategory_id: Uuid,
    pub subcategory_name: String,
    pub payment_method_id: Uuid,
    pub payment_method_name: String,
    pub description: Option<String>,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_id: Uuid,
    pub category_name: String,
    pub total: i64,
}

/// One month of expense data, ready for the renderer.
///
/// `rows` is ordered by date ascending and `totals_by_category` by total
/// descending (name ascending on ties).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpenseReport {
    pub month: Month,
    pub rows: Vec<ReportRow>,
    pub totals_by_category: Vec<CategoryTotal>,
    pub total: i64,
}

impl Ledger {
    pub async fn expense_report(&self, user_id: Uuid, month: Month) -> ResultLedger<ExpenseReport> {
        let txs = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::Kind.eq(Kind::Expense.as_str()))
            .filter(transactions::Column::Date.gte(month.start()))
            .filter(transactions::Column::Date.lt(month.end_exclusive()))
            .order_by_asc(transactions::Column::Date)
            .all(&self.database)
            .await?;

        // Name lookups built once per call, not per row.
        let category_names: HashMap<Uuid, String> = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(categories::Column::Kind.eq(Kind::Expense.as_str()))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let subcategory_names: HashMap<Uuid, String> = subcategories::Entity::find()
            .filter(subcategories::Column::UserId.eq(user_id))
            .filter(subcategories::Column::Kind.eq(Kind::Expense.as_str()))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();
        let payment_method_names: HashMap<Uuid, String> = payment_methods::Entity::find()
            .filter(payment_methods::Column::UserId.eq(user_id))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let lookup = |names: &HashMap<Uuid, String>, id: Uuid| {
            names.get(&id).cloned().unwrap_or_else(|| "-".to_string())
        };

        let mut rows = Vec::with_capacity(txs.len());
        let mut totals: HashMap<Uuid, i64> = HashMap::new();
        let mut total = 0i64;
        for tx in txs {
            *totals.entry(tx.category_id).or_insert(0) += tx.amount;
            total += tx.amount;
            rows.push(ReportRow {
                transaction_id: tx.id,
                date: tx.date,
                category_id: tx.category_id,
                category_name: lookup(&category_names, tx.category_id),
                subcategory_id: tx.subcategory_id,
                subcategory_name: lookup(&subcategory_names, tx.subcategory_id),
                payment_method_id: tx.payment_method_id,
                payment_method_name: lookup(&payment_method_names, tx.payment_method_id),
                description: tx.description,
                amount: tx.amount,
            });
        }

        let mut totals_by_category: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(category_id, total)| CategoryTotal {
                category_id,
                category_name: lookup(&category_names, category_id),
                total,
            })
            .collect();
        totals_by_category.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category_name.cmp(&b.category_name))
        });

        Ok(ExpenseReport {
            month,
            rows,
            totals_by_category,
            total,
        })
    }

    /// Builds the twelve monthly reports of a year, January first.
    ///
    /// Each month is aggregated independently; this keeps the sections
    /// self-consistent and matches the one-sheet-per-month workbook layout.
    pub async fn yearly_expense_reports(
        &self,
        user_id: Uuid,
        year: i32,
    ) -> ResultLedger<Vec<ExpenseReport>> {
        let mut reports = Vec::with_capacity(12);
        for month in Month::months_of(year)? {
            reports.push(self.expense_report(user_id, month).await?);
        }
        Ok(reports)
    }
}
