#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::FinanceError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── TransactionType ───────────────────────────────────────────

#[test]
fn test_transaction_type_parse() {
    assert_eq!(TransactionType::parse("income"), Some(TransactionType::Income));
    assert_eq!(TransactionType::parse("INCOME"), Some(TransactionType::Income));
    assert_eq!(TransactionType::parse(" expense "), Some(TransactionType::Expense));
    assert_eq!(TransactionType::parse("transfer"), None);
    assert_eq!(TransactionType::parse(""), None);
}

#[test]
fn test_transaction_type_roundtrips_through_str() {
    for kind in TransactionType::all() {
        assert_eq!(TransactionType::parse(kind.as_str()), Some(*kind));
    }
}

// ── Transaction ───────────────────────────────────────────────

#[test]
fn test_signed_amount() {
    let income = Transaction::new(1, TransactionType::Income, "Salary", dec!(100), date(2024, 1, 1));
    let expense = Transaction::new(1, TransactionType::Expense, "Food", dec!(40), date(2024, 1, 1));
    assert_eq!(income.signed_amount(), dec!(100));
    assert_eq!(expense.signed_amount(), dec!(-40));
}

#[test]
fn test_category_is_trimmed_but_case_preserved() {
    let txn = Transaction::new(1, TransactionType::Expense, "  Eating Out ", dec!(1), date(2024, 1, 1));
    assert_eq!(txn.category, "Eating Out");
}

#[test]
fn test_blank_category_falls_back() {
    assert_eq!(normalize_category("   "), "Uncategorized");
    let budget = Budget::new(1, "", dec!(10));
    assert_eq!(budget.category, "Uncategorized");
}

// ── parse_amount ──────────────────────────────────────────────

#[test]
fn test_parse_amount_plain() {
    assert_eq!(parse_amount("1000").unwrap(), dec!(1000));
    assert_eq!(parse_amount(" 12.50 ").unwrap(), dec!(12.5));
    assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
}

#[test]
fn test_parse_amount_thousands_separator() {
    assert_eq!(parse_amount("1,234.56").unwrap(), dec!(1234.56));
}

#[test]
fn test_parse_amount_rejects_negative() {
    assert!(matches!(
        parse_amount("-5"),
        Err(FinanceError::MalformedAmount(s)) if s == "-5"
    ));
}

#[test]
fn test_parse_amount_rejects_garbage() {
    assert!(matches!(parse_amount("abc"), Err(FinanceError::MalformedAmount(_))));
    assert!(matches!(parse_amount(""), Err(FinanceError::MalformedAmount(_))));
}

// ── parse_date ────────────────────────────────────────────────

#[test]
fn test_parse_date_blank_defaults_to_today() {
    let today = date(2024, 6, 30);
    assert_eq!(parse_date("", today).unwrap(), today);
    assert_eq!(parse_date("   ", today).unwrap(), today);
}

#[test]
fn test_parse_date_iso() {
    let today = date(2024, 6, 30);
    assert_eq!(parse_date("2024-03-15", today).unwrap(), date(2024, 3, 15));
}

#[test]
fn test_parse_date_rejects_other_formats() {
    let today = date(2024, 6, 30);
    assert!(matches!(
        parse_date("03/15/2024", today),
        Err(FinanceError::MalformedDate(..))
    ));
    assert!(matches!(
        parse_date("2024-02-30", today),
        Err(FinanceError::MalformedDate(..))
    ));
}

// ── ReportWindow ──────────────────────────────────────────────

#[test]
fn test_window_month_year_inputs() {
    let w = ReportWindow::parse_month_year("03", "2024").unwrap();
    assert_eq!(w, ReportWindow::Month { year: 2024, month: 3 });
    assert_eq!(w.date_prefix(), "2024-03");

    let w = ReportWindow::parse_month_year("3", "2024").unwrap();
    assert_eq!(w.date_prefix(), "2024-03");
}

#[test]
fn test_window_rejects_bad_month() {
    assert!(ReportWindow::parse_month_year("13", "2024").is_err());
    assert!(ReportWindow::parse_month_year("0", "2024").is_err());
    assert!(ReportWindow::parse_month_year("march", "2024").is_err());
}

#[test]
fn test_window_rejects_bad_year() {
    assert!(ReportWindow::parse_month_year("03", "24").is_err());
    assert!(ReportWindow::parse_month_year("03", "+202").is_err());
    assert!(ReportWindow::parse("20x4").is_err());
}

#[test]
fn test_window_parse_compact() {
    assert_eq!(
        ReportWindow::parse("2024-11").unwrap(),
        ReportWindow::Month { year: 2024, month: 11 }
    );
    assert_eq!(ReportWindow::parse("2023").unwrap(), ReportWindow::Year(2023));
}

#[test]
fn test_window_parse_year_rejects_months() {
    assert_eq!(ReportWindow::parse_year(" 2024 ").unwrap(), ReportWindow::Year(2024));
    assert!(matches!(
        ReportWindow::parse_year("2024-03"),
        Err(FinanceError::MalformedDate(raw, _)) if raw == "2024-03"
    ));
}

#[test]
fn test_window_containing_date() {
    assert_eq!(
        ReportWindow::containing(date(2024, 7, 4)),
        ReportWindow::Month { year: 2024, month: 7 }
    );
}
