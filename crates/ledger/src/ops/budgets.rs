//! Budget upserts and the budget-vs-actual overview.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    Budget, BudgetItem, Kind, Month, ResultLedger, budgets, categories, money, subcategories,
    transactions,
};

use super::subcategories::require_subcategory;
use super::{Ledger, with_tx};

/// One subcategory's budget-vs-actual standing for a month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetRow {
    pub subcategory_id: Uuid,
    pub subcategory_name: String,
    pub category_name: String,
    /// Planned amount, zero when no budget row exists.
    pub budget: i64,
    pub spent: i64,
    pub remaining: i64,
    /// Consumption percent clamped to `[0, 100]`, rounded to a whole number.
    /// Zero when the budget is zero, even with nonzero spend.
    pub percent: f64,
    /// The unclamped, unrounded ratio, for consumers that need the true
    /// overspend factor.
    pub percent_raw: f64,
}

impl Ledger {
    /// Sets the planned amounts for a month in one batch.
    ///
    /// Each row is keyed by `(user, year, month, subcategory)`: an existing
    /// row gets its amount updated in place, a missing one is inserted. Only
    /// expense subcategories can carry a budget.
    pub async fn upsert_budgets(
        &self,
        user_id: Uuid,
        month: Month,
        items: &[BudgetItem],
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            for item in items {
                require_subcategory(&db_tx, user_id, item.subcategory_id, Kind::Expense, None)
                    .await?;
                let amount = money::round_non_negative(item.amount)?;

                let existing = budgets::Entity::find()
                    .filter(budgets::Column::UserId.eq(user_id))
                    .filter(budgets::Column::Year.eq(month.year()))
                    .filter(budgets::Column::Month.eq(month.month() as i32))
                    .filter(budgets::Column::SubcategoryId.eq(item.subcategory_id))
                    .one(&db_tx)
                    .await?;

                match existing {
                    Some(model) => {
                        let active = budgets::ActiveModel {
                            id: ActiveValue::Set(model.id),
                            amount: ActiveValue::Set(amount),
                            ..Default::default()
                        };
                        active.update(&db_tx).await?;
                    }
                    None => {
                        let budget = Budget::new(user_id, month, item.subcategory_id, amount);
                        budgets::ActiveModel::from(&budget).insert(&db_tx).await?;
                    }
                }
            }
            Ok(())
        })
    }

    /// Builds the budget-vs-actual rows for a month.
    ///
    /// Every expense subcategory yields a row, budgeted or not; absent budget
    /// rows mean a zero budget. Rows are sorted by percent descending, then
    /// subcategory name ascending (case-insensitive), so the ordering is
    /// stable regardless of store enumeration order.
    pub async fn budget_overview(
        &self,
        user_id: Uuid,
        month: Month,
    ) -> ResultLedger<Vec<BudgetRow>> {
        let subs = subcategories::Entity::find()
            .filter(subcategories::Column::UserId.eq(user_id))
            .filter(subcategories::Column::Kind.eq(Kind::Expense.as_str()))
            .all(&self.database)
            .await?;
        let cats = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(categories::Column::Kind.eq(Kind::Expense.as_str()))
            .all(&self.database)
            .await?;
        let category_names: HashMap<Uuid, String> =
            cats.into_iter().map(|c| (c.id, c.name)).collect();

        let budget_models = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .filter(budgets::Column::Year.eq(month.year()))
            .filter(budgets::Column::Month.eq(month.month() as i32))
            .all(&self.database)
            .await?;
        let budget_by_sub: HashMap<Uuid, i64> = budget_models
            .into_iter()
            .map(|b| (b.subcategory_id, b.amount))
            .collect();

        let expense_models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::Kind.eq(Kind::Expense.as_str()))
            .filter(transactions::Column::Date.gte(month.start()))
            .filter(transactions::Column::Date.lt(month.end_exclusive()))
            .all(&self.database)
            .await?;
        let mut spent_by_sub: HashMap<Uuid, i64> = HashMap::new();
        for tx in expense_models {
            *spent_by_sub.entry(tx.subcategory_id).or_insert(0) += tx.amount;
        }

        let mut rows: Vec<BudgetRow> = subs
            .into_iter()
            .map(|sub| {
                let budget = budget_by_sub.get(&sub.id).copied().unwrap_or(0);
                let spent = spent_by_sub.get(&sub.id).copied().unwrap_or(0);
                let category_name = category_names
                    .get(&sub.category_id)
                    .cloned()
                    .unwrap_or_else(|| "-".to_string());
                let (percent, percent_raw) = consumption_percent(budget, spent);
                BudgetRow {
                    subcategory_id: sub.id,
                    subcategory_name: sub.name,
                    category_name,
                    budget,
                    spent,
                    remaining: budget - spent,
                    percent,
                    percent_raw,
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.percent
                .partial_cmp(&a.percent)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    a.subcategory_name
                        .to_lowercase()
                        .cmp(&b.subcategory_name.to_lowercase())
                })
        });
        Ok(rows)
    }
}

/// `(clamped display percent, raw ratio)`. A zero budget reports 0% even
/// with nonzero spend; the raw value is zero there too since no true ratio
/// exists.
fn consumption_percent(budget: i64, spent: i64) -> (f64, f64) {
    if budget <= 0 {
        return (0.0, 0.0);
    }
    let raw = (spent as f64 / budget as f64) * 100.0;
    (raw.clamp(0.0, 100.0).round(), raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_budget_reports_zero_percent() {
        assert_eq!(consumption_percent(0, 50_000), (0.0, 0.0));
    }

    #[test]
    fn overspend_clamps_display_but_keeps_raw() {
        let (percent, raw) = consumption_percent(100_000, 150_000);
        assert_eq!(percent, 100.0);
        assert_eq!(raw, 150.0);
    }

    #[test]
    fn partial_spend_rounds_display_percent() {
        let (percent, raw) = consumption_percent(300_000, 100_000);
        assert_eq!(percent, 33.0);
        assert!((raw - 33.333_333).abs() < 0.001);
    }
}
