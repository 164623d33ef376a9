//! Derived figures over a user's ledger: windowed reports, the all-time
//! balance, and budget status. All read-only.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::db::Database;
use crate::error::Result;
use crate::models::{normalize_category, ReportWindow, TransactionType, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Report {
    pub(crate) window: ReportWindow,
    /// Only types that had transactions in the window.
    pub(crate) rows: BTreeMap<TransactionType, Decimal>,
    pub(crate) total_income: Decimal,
    pub(crate) total_expenses: Decimal,
    /// Negative when expenses exceed income.
    pub(crate) savings: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Balance {
    pub(crate) total_income: Decimal,
    pub(crate) total_expenses: Decimal,
    pub(crate) balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BudgetStatus {
    pub(crate) category: String,
    pub(crate) limit: Decimal,
    pub(crate) spent: Decimal,
    /// `limit - spent`; negative once over budget.
    pub(crate) remaining: Decimal,
}

impl BudgetStatus {
    pub(crate) fn over_budget(&self) -> bool {
        self.spent > self.limit
    }
}

pub(crate) fn generate_report(db: &Database, user_id: UserId, window: ReportWindow) -> Result<Report> {
    let rows = db.sum_by_type_in_window(user_id, &window)?;
    let total_income = rows
        .get(&TransactionType::Income)
        .copied()
        .unwrap_or(Decimal::ZERO);
    let total_expenses = rows
        .get(&TransactionType::Expense)
        .copied()
        .unwrap_or(Decimal::ZERO);

    Ok(Report {
        window,
        rows,
        total_income,
        total_expenses,
        savings: total_income - total_expenses,
    })
}

pub(crate) fn compute_balance(db: &Database, user_id: UserId) -> Result<Balance> {
    let total_income = db.sum_by_type(user_id, TransactionType::Income)?;
    let total_expenses = db.sum_by_type(user_id, TransactionType::Expense)?;
    Ok(Balance {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
    })
}

/// Each budget paired with that category's expenses inside `window`.
/// Category names match exactly.
pub(crate) fn budget_status(
    db: &Database,
    user_id: UserId,
    window: ReportWindow,
) -> Result<Vec<BudgetStatus>> {
    let spending = db.get_spending_by_category(user_id, &window)?;
    let budgets = db.get_budgets(user_id)?;

    Ok(budgets
        .into_iter()
        .map(|budget| {
            let spent = spending
                .iter()
                .find(|(name, _)| *name == budget.category)
                .map(|(_, amt)| *amt)
                .unwrap_or(Decimal::ZERO);
            BudgetStatus {
                remaining: budget.limit_amount - spent,
                category: budget.category,
                limit: budget.limit_amount,
                spent,
            }
        })
        .collect())
}

/// The category's status for the month containing `date`, if it has a
/// budget and is over it.
pub(crate) fn budget_alert(
    db: &Database,
    user_id: UserId,
    category: &str,
    date: NaiveDate,
) -> Result<Option<BudgetStatus>> {
    let category = normalize_category(category);
    let over = budget_status(db, user_id, ReportWindow::containing(date))?
        .into_iter()
        .find(|s| s.category == category && s.over_budget());
    Ok(over)
}
