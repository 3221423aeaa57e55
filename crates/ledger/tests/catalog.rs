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

#[tokio::test]
async fn payment_method_delete_is_blocked_while_referenced() {
    let ledger = ledger_with_db().await;
    let user = Uuid::new_v4();
    let cash = ledger.new_payment_method(user, "Cash", 0.0).await.unwrap();
    let bank = ledger.new_payment_method(user, "Bank", 0.0).await.unwrap();
    let category = ledger
        .new_category(user, Kind::Expense, "Food")
        .await
        .unwrap();
    let subcategory = ledger
        .new_subcategory(user, Kind::Expense, category.id, "Groceries")
        .await
        .unwrap();

    let tx = ledger
        .create_transaction(TransactionCmd::new(
            user,
            Kind::Expense,
            5_000.0,
            category.id,
            subcategory.id,
            cash.id,
            d(2026, 8, 1),
        ))
        .await
        .unwrap();

    let err = ledger.delete_payment_method(user, cash.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));

    // Transfer references block the delete as well, on either leg.
    let transfer = ledger
        .create_transfer(TransferCmd::new(
            user,
            1_000.0,
            bank.id,
            cash.id,
            d(2026, 8, 2),
        ))
        .await
        .unwrap();
    let err = ledger.delete_payment_method(user, bank.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));

    ledger.delete_transaction(user, tx.id).await.unwrap();
    ledger.delete_transfer(user, transfer.id).await.unwrap();
    ledger.delete_payment_method(user, cash.id).await.unwrap();
    ledger.delete_payment_method(user, bank.id).await.unwrap();
}

#[tokio::test]
async fn category_delete_requires_removing_subcategories_first() {
    let ledger = ledger_with_db().await;
    let user = Uuid::new_v4();
    let category = ledger
        .new_category(user, Kind::Expense, "Food")
        .await
        .unwrap();
    let subcategory = ledger
        .new_subcategory(user, Kind::Expense, category.id, "Groceries")
        .await
        .unwrap();

    let err = ledger.delete_category(user, category.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));

    ledger
        .delete_subcategory(user, subcategory.id)
        .await
        .unwrap();
    ledger.delete_category(user, category.id).await.unwrap();
}

#[tokio::test]
async fn subcategory_delete_is_blocked_by_transactions_and_cascades_budgets() {
    let ledger = ledger_with_db().await;
    let user = Uuid::new_v4();
    let cash = ledger.new_payment_method(user, "Cash", 0.0).await.unwrap();
    let category = ledger
        .new_category(user, Kind::Expense, "Food")
        .await
        .unwrap();
    let subcategory = ledger
        .new_subcategory(user, Kind::Expense, category.id, "Groceries")
        .await
        .unwrap();
    let month: Month = "2026-08".parse().unwrap();
    ledger
        .upsert_budgets(user, month, &[BudgetItem::new(subcategory.id, 100_000.0)])
        .await
        .unwrap();

    let tx = ledger
        .create_transaction(TransactionCmd::new(
            user,
            Kind::Expense,
            5_000.0,
            category.id,
            subcategory.id,
            cash.id,
            d(2026, 8, 1),
        ))
        .await
        .unwrap();

    let err = ledger
        .delete_subcategory(user, subcategory.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));

    ledger.delete_transaction(user, tx.id).await.unwrap();
    ledger
        .delete_subcategory(user, subcategory.id)
        .await
        .unwrap();

    // The budget rows went with the subcategory.
    let rows = ledger.budget_overview(user, month).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn subcategory_kind_must_match_its_parent() {
    let ledger = ledger_with_db().await;
    let user = Uuid::new_v4();
    let category = ledger
        .new_category(user, Kind::Income, "Salary")
        .await
        .unwrap();

    let err = ledger
        .new_subcategory(user, Kind::Expense, category.id, "Groceries")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let err = ledger
        .new_subcategory(user, Kind::Expense, Uuid::new_v4(), "Groceries")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn names_are_trimmed_and_blank_names_rejected() {
    let ledger = ledger_with_db().await;
    let user = Uuid::new_v4();

    let method = ledger
        .new_payment_method(user, "  Cash  ", 0.0)
        .await
        .unwrap();
    assert_eq!(method.name, "Cash");

    let err = ledger.new_payment_method(user, "   ", 0.0).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let renamed = ledger
        .rename_payment_method(user, method.id, " Wallet ")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Wallet");
    assert_eq!(renamed.balance, method.balance);
}

#[tokio::test]
async fn listings_are_sorted_by_name() {
    let ledger = ledger_with_db().await;
    let user = Uuid::new_v4();
    ledger.new_payment_method(user, "Wallet", 0.0).await.unwrap();
    ledger.new_payment_method(user, "Bank", 0.0).await.unwrap();
    ledger.new_payment_method(user, "Cash", 0.0).await.unwrap();

    let names: Vec<String> = ledger
        .payment_methods(user)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, ["Bank", "Cash", "Wallet"]);

    let food = ledger
        .new_category(user, Kind::Expense, "Food")
        .await
        .unwrap();
    ledger
        .new_subcategory(user, Kind::Expense, food.id, "Snacks")
        .await
        .unwrap();
    ledger
        .new_subcategory(user, Kind::Expense, food.id, "Groceries")
        .await
        .unwrap();

    let names: Vec<String> = ledger
        .subcategories(user, Kind::Expense, Some(food.id))
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["Groceries", "Snacks"]);
}

#[tokio::test]
async fn reparenting_a_subcategory_keeps_the_kind() {
    let ledger = ledger_with_db().await;
    let user = Uuid::new_v4();
    let food = ledger
        .new_category(user, Kind::Expense, "Food")
        .await
        .unwrap();
    let transport = ledger
        .new_category(user, Kind::Expense, "Transport")
        .await
        .unwrap();
    let salary = ledger
        .new_category(user, Kind::Income, "Salary")
        .await
        .unwrap();
    let subcategory = ledger
        .new_subcategory(user, Kind::Expense, food.id, "Fuel")
        .await
        .unwrap();

    let moved = ledger
        .update_subcategory(user, subcategory.id, transport.id, "Fuel")
        .await
        .unwrap();
    assert_eq!(moved.category_id, transport.id);
    assert_eq!(moved.kind, Kind::Expense);

    let err = ledger
        .update_subcategory(user, subcategory.id, salary.id, "Fuel")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}
