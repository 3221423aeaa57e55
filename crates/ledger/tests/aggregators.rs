use chrono::NaiveDate;
use sea_orm::Database;
use uuid::Uuid;

use ledger::{BudgetItem, Kind, Ledger, LedgerError, Month, TransactionCmd, TransferCmd};
use migration::MigratorTrait;

async fn ledger_with_db() -> Ledger {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Ledger::builder().database(db).build().await.unwrap()
}

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn august() -> Month {
    "2026-08".parse().unwrap()
}

struct Fixture {
    user: Uuid,
    cash: Uuid,
    food: Uuid,
    groceries: Uuid,
    transport: Uuid,
    fuel: Uuid,
}

/// Two expense categories with one subcategory each, plus a payment method.
async fn fixture(ledger: &Ledger) -> Fixture {
    let user = Uuid::new_v4();
    let cash = ledger
        .new_payment_method(user, "Cash", 10_000_000.0)
        .await
        .unwrap();
    let food = ledger
        .new_category(user, Kind::Expense, "Food")
        .await
        .unwrap();
    let groceries = ledger
        .new_subcategory(user, Kind::Expense, food.id, "Groceries")
        .await
        .unwrap();
    let transport = ledger
        .new_category(user, Kind::Expense, "Transport")
        .await
        .unwrap();
    let fuel = ledger
        .new_subcategory(user, Kind::Expense, transport.id, "Fuel")
        .await
        .unwrap();
    Fixture {
        user,
        cash: cash.id,
        food: food.id,
        groceries: groceries.id,
        transport: transport.id,
        fuel: fuel.id,
    }
}

async fn spend(ledger: &Ledger, fx: &Fixture, category: Uuid, subcategory: Uuid, amount: f64, date: NaiveDate) {
    ledger
        .create_transaction(TransactionCmd::new(
            fx.user,
            Kind::Expense,
            amount,
            category,
            subcategory,
            fx.cash,
            date,
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn budget_overview_clamps_percent_and_keeps_the_raw_ratio() {
    let ledger = ledger_with_db().await;
    let fx = fixture(&ledger).await;

    ledger
        .upsert_budgets(
            fx.user,
            august(),
            &[BudgetItem::new(fx.groceries, 100_000.0)],
        )
        .await
        .unwrap();
    spend(&ledger, &fx, fx.food, fx.groceries, 150_000.0, d(2026, 8, 5)).await;
    spend(&ledger, &fx, fx.transport, fx.fuel, 20_000.0, d(2026, 8, 6)).await;

    let rows = ledger.budget_overview(fx.user, august()).await.unwrap();
    assert_eq!(rows.len(), 2);

    // Overspent row first (percent 100), unbudgeted row after (percent 0).
    assert_eq!(rows[0].subcategory_id, fx.groceries);
    assert_eq!(rows[0].budget, 100_000);
    assert_eq!(rows[0].spent, 150_000);
    assert_eq!(rows[0].remaining, -50_000);
    assert_eq!(rows[0].percent, 100.0);
    assert_eq!(rows[0].percent_raw, 150.0);
    assert_eq!(rows[0].category_name, "Food");

    assert_eq!(rows[1].subcategory_id, fx.fuel);
    assert_eq!(rows[1].budget, 0);
    assert_eq!(rows[1].spent, 20_000);
    assert_eq!(rows[1].percent, 0.0);
    assert_eq!(rows[1].percent_raw, 0.0);
}

#[tokio::test]
async fn budget_rows_only_count_the_selected_month() {
    let ledger = ledger_with_db().await;
    let fx = fixture(&ledger).await;

    ledger
        .upsert_budgets(fx.user, august(), &[BudgetItem::new(fx.groceries, 200_000.0)])
        .await
        .unwrap();
    spend(&ledger, &fx, fx.food, fx.groceries, 50_000.0, d(2026, 8, 31)).await;
    spend(&ledger, &fx, fx.food, fx.groceries, 70_000.0, d(2026, 9, 1)).await;

    let rows = ledger.budget_overview(fx.user, august()).await.unwrap();
    let groceries = rows
        .iter()
        .find(|r| r.subcategory_id == fx.groceries)
        .unwrap();
    assert_eq!(groceries.spent, 50_000);
    assert_eq!(groceries.remaining, 150_000);
    assert_eq!(groceries.percent, 25.0);
}

#[tokio::test]
async fn budget_upsert_updates_the_amount_in_place() {
    let ledger = ledger_with_db().await;
    let fx = fixture(&ledger).await;

    ledger
        .upsert_budgets(fx.user, august(), &[BudgetItem::new(fx.groceries, 100_000.0)])
        .await
        .unwrap();
    ledger
        .upsert_budgets(fx.user, august(), &[BudgetItem::new(fx.groceries, 250_000.0)])
        .await
        .unwrap();

    let rows = ledger.budget_overview(fx.user, august()).await.unwrap();
    let groceries = rows
        .iter()
        .find(|r| r.subcategory_id == fx.groceries)
        .unwrap();
    assert_eq!(groceries.budget, 250_000);
}

#[tokio::test]
async fn budgets_reject_income_subcategories() {
    let ledger = ledger_with_db().await;
    let fx = fixture(&ledger).await;
    let salary = ledger
        .new_category(fx.user, Kind::Income, "Salary")
        .await
        .unwrap();
    let paycheck = ledger
        .new_subcategory(fx.user, Kind::Income, salary.id, "Paycheck")
        .await
        .unwrap();

    let err = ledger
        .upsert_budgets(fx.user, august(), &[BudgetItem::new(paycheck.id, 1_000.0)])
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn expense_report_orders_rows_by_date_and_totals_by_amount() {
    let ledger = ledger_with_db().await;
    let fx = fixture(&ledger).await;

    spend(&ledger, &fx, fx.transport, fx.fuel, 30_000.0, d(2026, 8, 20)).await;
    spend(&ledger, &fx, fx.food, fx.groceries, 80_000.0, d(2026, 8, 3)).await;
    spend(&ledger, &fx, fx.food, fx.groceries, 40_000.0, d(2026, 8, 12)).await;
    // Outside the month, excluded.
    spend(&ledger, &fx, fx.food, fx.groceries, 999_999.0, d(2026, 7, 31)).await;

    let report = ledger.expense_report(fx.user, august()).await.unwrap();
    assert_eq!(report.total, 150_000);

    let dates: Vec<NaiveDate> = report.rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, [d(2026, 8, 3), d(2026, 8, 12), d(2026, 8, 20)]);
    assert_eq!(report.rows[0].category_name, "Food");
    assert_eq!(report.rows[0].subcategory_name, "Groceries");
    assert_eq!(report.rows[0].payment_method_name, "Cash");

    assert_eq!(report.totals_by_category.len(), 2);
    assert_eq!(report.totals_by_category[0].category_id, fx.food);
    assert_eq!(report.totals_by_category[0].total, 120_000);
    assert_eq!(report.totals_by_category[1].category_id, fx.transport);
    assert_eq!(report.totals_by_category[1].total, 30_000);
}

#[tokio::test]
async fn yearly_reports_cover_twelve_independent_months() {
    let ledger = ledger_with_db().await;
    let fx = fixture(&ledger).await;

    spend(&ledger, &fx, fx.food, fx.groceries, 10_000.0, d(2026, 3, 15)).await;
    spend(&ledger, &fx, fx.food, fx.groceries, 25_000.0, d(2026, 11, 2)).await;

    let reports = ledger.yearly_expense_reports(fx.user, 2026).await.unwrap();
    assert_eq!(reports.len(), 12);
    assert_eq!(reports[0].month, "2026-01".parse().unwrap());
    assert_eq!(reports[2].total, 10_000);
    assert_eq!(reports[10].total, 25_000);
    assert!(reports[5].rows.is_empty());
}

#[tokio::test]
async fn dashboard_composes_totals_series_and_transfers() {
    let ledger = ledger_with_db().await;
    let fx = fixture(&ledger).await;
    let bank = ledger
        .new_payment_method(fx.user, "Bank", 0.0)
        .await
        .unwrap();
    let salary = ledger
        .new_category(fx.user, Kind::Income, "Salary")
        .await
        .unwrap();
    let paycheck = ledger
        .new_subcategory(fx.user, Kind::Income, salary.id, "Paycheck")
        .await
        .unwrap();

    ledger
        .create_transaction(TransactionCmd::new(
            fx.user,
            Kind::Income,
            2_000_000.0,
            salary.id,
            paycheck.id,
            fx.cash,
            d(2026, 8, 1),
        ))
        .await
        .unwrap();
    spend(&ledger, &fx, fx.food, fx.groceries, 120_000.0, d(2026, 8, 14)).await;
    spend(&ledger, &fx, fx.food, fx.groceries, 30_000.0, d(2026, 8, 15)).await;
    ledger
        .create_transfer(TransferCmd::new(
            fx.user,
            500_000.0,
            fx.cash,
            bank.id,
            d(2026, 8, 10),
        ))
        .await
        .unwrap();

    let today = d(2026, 8, 15);
    let view = ledger
        .dashboard_overview(fx.user, august(), 7, today)
        .await
        .unwrap();

    assert_eq!(view.income_total, 2_000_000);
    assert_eq!(view.expense_total, 150_000);
    assert_eq!(view.net_total, 1_850_000);
    assert_eq!(view.today_expense_total, 30_000);

    // One point per day over [Aug 9, Aug 16), zero-filled.
    assert_eq!(view.daily_expense.len(), 7);
    assert_eq!(view.daily_expense[0].date, d(2026, 8, 9));
    assert_eq!(view.daily_expense[5].date, d(2026, 8, 14));
    assert_eq!(view.daily_expense[5].amount, 120_000);
    assert_eq!(view.daily_expense[6].amount, 30_000);
    assert_eq!(view.daily_expense[2].amount, 0);

    assert_eq!(view.recent_transfers.len(), 1);
    assert_eq!(view.recent_transfers[0].amount, 500_000);

    // Balances are read as stored, post transfer and spending.
    let cash = view
        .payment_methods
        .iter()
        .find(|m| m.id == fx.cash)
        .unwrap();
    assert_eq!(cash.balance, 10_000_000 + 2_000_000 - 150_000 - 500_000);
}

#[tokio::test]
async fn dashboard_rejects_out_of_range_windows() {
    let ledger = ledger_with_db().await;
    let fx = fixture(&ledger).await;

    for days in [0, 6, 91] {
        let err = ledger
            .dashboard_overview(fx.user, august(), days, d(2026, 8, 15))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }
}
