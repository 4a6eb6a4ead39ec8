mod common;

use chrono::NaiveDate;
use common::setup_test_env;
use fintrack::core::AppError;
use fintrack_core::CoreError;
use fintrack_domain::{Category, CategoryFilter, EntryDraft, MonthKey, RawEntry};

fn d(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

#[test]
fn commands_fail_before_a_book_is_open() {
    let (mut manager, _) = setup_test_env();
    assert!(matches!(manager.view(CategoryFilter::All), Err(AppError::BookNotOpen)));
    assert!(matches!(
        manager.add(&EntryDraft::on(d(1, 5))),
        Err(AppError::BookNotOpen)
    ));
}

#[test]
fn scenario_view_matches_expected_balances() {
    let (mut manager, _) = setup_test_env();
    let report = manager.open("asha").unwrap();
    assert!(report.created);

    manager
        .add(&EntryDraft::on(d(2, 1)).expense(200.0).category(Category::Bills))
        .unwrap();
    manager
        .add(&EntryDraft::on(d(1, 5)).expense(50.0).category(Category::Food))
        .unwrap();
    manager
        .add(&EntryDraft::on(d(1, 20)).income(1000.0).category(Category::Salary))
        .unwrap();

    let view = manager.view(CategoryFilter::All).unwrap();
    assert_eq!(view.balances(), vec![-50.0, 950.0, 750.0]);
    assert_eq!(view.monthly_groups.len(), 2);
    assert_eq!(view.monthly_groups[0].month, MonthKey::new(2024, 1));
    assert_eq!(view.monthly_groups[1].entries[0].balance, 750.0);
    assert_eq!(view.summary.total_income, 1000.0);
    assert_eq!(view.summary.total_expense, 250.0);
    assert_eq!(view.summary.balance, 750.0);
    assert_eq!(view.summary.count, 3);

    let bills = manager.view(CategoryFilter::Only(Category::Bills)).unwrap();
    assert_eq!(bills.balances(), vec![-200.0]);
}

#[test]
fn changes_survive_reopening() {
    let (mut manager, _) = setup_test_env();
    manager.open("ravi").unwrap();
    let id = manager
        .add(&EntryDraft::on(d(3, 2)).expense(12.5).description("tea"))
        .unwrap();
    manager.close();

    let report = manager.open("ravi").unwrap();
    assert!(!report.created);
    assert_eq!(report.entries, 1);
    let entry = manager.entry(id).unwrap();
    assert_eq!(entry.description.as_deref(), Some("tea"));
    assert_eq!(entry.category, Category::Other);
}

#[test]
fn invalid_drafts_leave_the_book_untouched() {
    let (mut manager, _) = setup_test_env();
    manager.open("ravi").unwrap();
    let err = manager
        .add(&EntryDraft::on(d(3, 2)).expense(-4.0))
        .unwrap_err();
    assert!(matches!(err, AppError::Core(CoreError::Validation(_))));
    assert!(manager.book().unwrap().is_empty());
}

#[test]
fn import_coerces_and_skips() {
    let (mut manager, _) = setup_test_env();
    manager.open("mira").unwrap();
    let report = manager
        .import(vec![
            RawEntry::new("2024-01-05").with_amounts(0, 50).with_category("food"),
            RawEntry::new("not a date").with_amounts(10, 0),
            RawEntry::new("2024-01-20")
                .with_amounts("1000", "oops")
                .with_category("Payroll"),
        ])
        .unwrap();
    assert_eq!(report.accepted(), 2);
    assert_eq!(report.skipped.len(), 1);

    let view = manager.view(CategoryFilter::All).unwrap();
    assert_eq!(view.balances(), vec![-50.0, 950.0]);
    assert!(view.category_totals.contains_key(&Category::Other));
}

#[test]
fn restore_by_position_replaces_the_open_book() {
    let (mut manager, _) = setup_test_env();
    manager.open("noor").unwrap();
    manager.add(&EntryDraft::on(d(1, 1)).income(10.0)).unwrap();
    let snapshot = manager.backup(Some("one entry")).unwrap();
    manager.add(&EntryDraft::on(d(1, 2)).income(20.0)).unwrap();

    let restored = manager.restore(&snapshot.id).unwrap();
    assert_eq!(restored.id, snapshot.id);
    assert_eq!(manager.book().unwrap().len(), 1);
    assert!(manager.restore("99").is_err());
}

#[test]
fn deleting_the_open_user_closes_it() {
    let (mut manager, _) = setup_test_env();
    manager.open("dev").unwrap();
    manager.open("maya").unwrap();
    manager.delete_user("maya").unwrap();
    assert!(!manager.is_open());
    assert_eq!(manager.list_users().unwrap(), vec!["dev".to_string()]);
    assert!(matches!(
        manager.delete_user("maya"),
        Err(AppError::Core(CoreError::BookNotFound(_)))
    ));
}
