//! The dashboard aggregator.
//!
//! Composes monthly totals, current balances, the budget overview, a daily
//! expense series and recent transfers into one summary view. Everything is
//! recomputed from source records on each call except payment method
//! balances, which are read as stored.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{
    Kind, LedgerError, Month, PaymentMethod, ResultLedger, transactions,
    transfers, transfers::Transfer,
};

use super::budgets::BudgetRow;
use super::Ledger;

const RECENT_TRANSFERS_LIMIT: u64 = 20;

/// One day of the expense series. Days with no expense carry amount zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub month: Month,
    pub income_total: i64,
    pub expense_total: i64,
    pub net_total: i64,
    pub today_expense_total: i64,
    pub payment_methods: Vec<PaymentMethod>,
    pub daily_expense: Vec<DailyPoint>,
    pub budgets: Vec<BudgetRow>,
    pub recent_transfers: Vec<Transfer>,
}

impl Ledger {
    /// Builds the dashboard for one month.
    ///
    /// `today` anchors the daily series and the today-expense total; it is
    /// passed in rather than read from a clock so the view is reproducible.
    /// `days` is the series lookback window, between 7 and 90. The series
    /// covers `[max(month_start, end - days), end)` where `end` is the
    /// earlier of the next month start and tomorrow, with one point per
    /// calendar day, no gaps.
    pub async fn dashboard_overview(
        &self,
        user_id: Uuid,
        month: Month,
        days: u32,
        today: NaiveDate,
    ) -> ResultLedger<DashboardOverview> {
        if !(7..=90).contains(&days) {
            return Err(LedgerError::Validation(format!(
                "days must be in 7..=90, got {days}"
            )));
        }

        let expense_txs = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::Kind.eq(Kind::Expense.as_str()))
            .filter(transactions::Column::Date.gte(month.start()))
            .filter(transactions::Column::Date.lt(month.end_exclusive()))
            .all(&self.database)
            .await?;
        let income_total: i64 = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::Kind.eq(Kind::Income.as_str()))
            .filter(transactions::Column::Date.gte(month.start()))
            .filter(transactions::Column::Date.lt(month.end_exclusive()))
            .all(&self.database)
            .await?
            .iter()
            .map(|tx| tx.amount)
            .sum();

        let expense_total: i64 = expense_txs.iter().map(|tx| tx.amount).sum();
        let today_expense_total: i64 = expense_txs
            .iter()
            .filter(|tx| tx.date == today)
            .map(|tx| tx.amount)
            .sum();

        let methods = self.payment_methods(user_id).await?;
        let daily_expense = daily_series(&expense_txs, month, days, today);
        let budgets = self.budget_overview(user_id, month).await?;

        let recent_transfers = transfers::Entity::find()
            .filter(transfers::Column::UserId.eq(user_id))
            .filter(transfers::Column::Date.gte(month.start()))
            .filter(transfers::Column::Date.lt(month.end_exclusive()))
            .order_by_desc(transfers::Column::Date)
            .limit(RECENT_TRANSFERS_LIMIT)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transfer::from)
            .collect();

        Ok(DashboardOverview {
            month,
            income_total,
            expense_total,
            net_total: income_total - expense_total,
            today_expense_total,
            payment_methods: methods,
            daily_expense,
            budgets,
            recent_transfers,
        })
    }
}

/// Zero-filled daily expense series over the dashboard window.
fn daily_series(
    expense_txs: &[transactions::Model],
    month: Month,
    days: u32,
    today: NaiveDate,
) -> Vec<DailyPoint> {
    let tomorrow = today + Days::new(1);
    let end = month.end_exclusive().min(tomorrow);
    let start = month.start().max(end - Days::new(u64::from(days)));

    let mut by_day: HashMap<NaiveDate, i64> = HashMap::new();
    for tx in expense_txs {
        if tx.date >= start && tx.date < end {
            *by_day.entry(tx.date).or_insert(0) += tx.amount;
        }
    }

    let mut points = Vec::new();
    let mut cursor = start;
    while cursor < end {
        points.push(DailyPoint {
            date: cursor,
            amount: by_day.get(&cursor).copied().unwrap_or(0),
        });
        cursor = cursor + Days::new(1);
    }
    points
}
