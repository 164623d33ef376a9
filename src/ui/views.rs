use rust_decimal::Decimal;

use super::table::{Align, Cell, Table};
use super::theme::{self, Theme};
use super::util::{capitalize, format_amount};
use crate::models::{ReportWindow, Transaction, TransactionType, DATE_FORMAT};
use crate::report::{Balance, BudgetStatus, Report};

pub(crate) fn render_report(report: &Report, theme: &Theme) -> String {
    let mut table = Table::new(&["Type", "Total Amount"])
        .title(format!(
            "{} Financial Report ({})",
            report.window.period_name(),
            report.window
        ))
        .align(&[Align::Center, Align::Right]);
    for (kind, total) in &report.rows {
        table.row(vec![kind.as_str().into(), format_amount(*total).into()]);
    }

    let mut out = table.render(theme);
    out.push_str(&format!("Total Income: {}\n", format_amount(report.total_income)));
    out.push_str(&format!(
        "Total Expenses: {}\n",
        format_amount(report.total_expenses)
    ));
    out.push_str(&format!(
        "Savings: {}\n",
        theme.paint(
            &format_amount(report.savings),
            Theme::amount_color(report.savings)
        )
    ));
    out
}

pub(crate) fn render_balance(balance: &Balance, theme: &Theme) -> String {
    let mut table = Table::new(&["", "Amount"])
        .title("Balance Summary")
        .align(&[Align::Left, Align::Right]);
    table.row(vec![
        "Total Income".into(),
        format_amount(balance.total_income).into(),
    ]);
    table.row(vec![
        "Total Expenses".into(),
        format_amount(balance.total_expenses).into(),
    ]);
    table.row(vec![
        "Current Balance".into(),
        Cell::colored(
            format_amount(balance.balance),
            Theme::amount_color(balance.balance),
        ),
    ]);
    table.render(theme)
}

pub(crate) fn render_transactions(txns: &[Transaction], theme: &Theme) -> String {
    if txns.is_empty() {
        return format!("{}\n", theme.dim("No transactions"));
    }
    let mut table = Table::new(&["ID", "Date", "Type", "Category", "Amount"])
        .title("Transactions")
        .align(&[Align::Right, Align::Left, Align::Left, Align::Left, Align::Right]);
    for txn in txns {
        let color = match txn.kind {
            TransactionType::Income => theme::GREEN,
            TransactionType::Expense => theme::RED,
        };
        table.row(vec![
            txn.id.map(|id| id.to_string()).unwrap_or_default().into(),
            txn.date.format(DATE_FORMAT).to_string().into(),
            capitalize(txn.kind.as_str()).into(),
            txn.category.as_str().into(),
            Cell::colored(format_amount(txn.signed_amount()), color),
        ]);
    }
    table.render(theme)
}

pub(crate) fn render_budget_status(
    statuses: &[BudgetStatus],
    window: &ReportWindow,
    theme: &Theme,
) -> String {
    if statuses.is_empty() {
        return format!("{}\n", theme.dim("No budgets set"));
    }
    let mut table = Table::new(&["Category", "Limit", "Spent", "Remaining"])
        .title(format!("Budgets ({window})"))
        .align(&[Align::Left, Align::Right, Align::Right, Align::Right]);
    for status in statuses {
        table.row(vec![
            status.category.as_str().into(),
            format_amount(status.limit).into(),
            Cell::colored(format_amount(status.spent), usage_color(status)),
            Cell::colored(
                format_amount(status.remaining),
                Theme::amount_color(status.remaining),
            ),
        ]);
    }
    table.render(theme)
}

pub(crate) fn budget_warning(status: &BudgetStatus) -> String {
    format!(
        "Warning: {} is over budget ({} spent of {})",
        status.category,
        format_amount(status.spent),
        format_amount(status.limit)
    )
}

/// Red once over the limit, yellow past 70% of it, green otherwise.
fn usage_color(status: &BudgetStatus) -> crossterm::style::Color {
    if status.over_budget() {
        theme::RED
    } else if status
        .limit
        .checked_mul(Decimal::new(7, 1))
        .is_some_and(|threshold| status.spent > threshold)
    {
        theme::YELLOW
    } else {
        theme::GREEN
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_report_view() {
        let mut rows = BTreeMap::new();
        rows.insert(TransactionType::Income, dec!(1000));
        rows.insert(TransactionType::Expense, dec!(200));
        let report = Report {
            window: ReportWindow::Month {
                year: 2024,
                month: 3,
            },
            rows,
            total_income: dec!(1000),
            total_expenses: dec!(200),
            savings: dec!(800),
        };

        let out = render_report(&report, &Theme::plain());
        assert!(out.starts_with("Monthly Financial Report (2024-03)\n"));
        assert!(out.contains("│ income  │     1,000.00 │"));
        assert!(out.contains("│ expense │       200.00 │"));
        assert!(out.ends_with("Total Income: 1,000.00\nTotal Expenses: 200.00\nSavings: 800.00\n"));
        // Income sorts before expense
        assert!(out.find("income").unwrap_or(usize::MAX) < out.find("expense").unwrap_or(0));
    }

    #[test]
    fn test_balance_view() {
        let out = render_balance(
            &Balance {
                total_income: dec!(1000),
                total_expenses: dec!(1200.5),
                balance: dec!(-200.5),
            },
            &Theme::plain(),
        );
        assert!(out.contains("Total Income    │ 1,000.00"));
        assert!(out.contains("Current Balance │  -200.50"));
    }

    #[test]
    fn test_empty_views() {
        let theme = Theme::plain();
        assert_eq!(render_transactions(&[], &theme), "No transactions\n");
        assert_eq!(
            render_budget_status(&[], &ReportWindow::Year(2024), &theme),
            "No budgets set\n"
        );
    }

    #[test]
    fn test_budget_warning_text() {
        let status = BudgetStatus {
            category: "Food".into(),
            limit: dec!(250),
            spent: dec!(1260),
            remaining: dec!(-1010),
        };
        assert_eq!(
            budget_warning(&status),
            "Warning: Food is over budget (1,260.00 spent of 250.00)"
        );
    }

    #[test]
    fn test_usage_color_thresholds() {
        let status = |spent: Decimal| BudgetStatus {
            category: "Food".into(),
            limit: dec!(100),
            spent,
            remaining: dec!(100) - spent,
        };
        assert_eq!(usage_color(&status(dec!(50))), theme::GREEN);
        assert_eq!(usage_color(&status(dec!(70))), theme::GREEN);
        assert_eq!(usage_color(&status(dec!(71))), theme::YELLOW);
        assert_eq!(usage_color(&status(dec!(100))), theme::YELLOW);
        assert_eq!(usage_color(&status(dec!(100.01))), theme::RED);
    }

    #[test]
    fn test_usage_color_at_decimal_limits() {
        let status = BudgetStatus {
            category: "Rent".into(),
            limit: Decimal::MAX,
            spent: Decimal::MAX,
            remaining: Decimal::ZERO,
        };
        assert_eq!(usage_color(&status), theme::YELLOW);
    }
}
