use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{FinanceError, Result};

pub(crate) type TransactionId = i64;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Category used when the user leaves the category blank.
pub(crate) const DEFAULT_CATEGORY: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn all() -> &'static [TransactionType] {
        &[Self::Income, Self::Expense]
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<TransactionId>,
    pub user_id: i64,
    pub kind: TransactionType,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub created_at: String,
}

impl Transaction {
    pub fn new(
        user_id: i64,
        kind: TransactionType,
        category: &str,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            user_id,
            kind,
            category: normalize_category(category),
            amount,
            date,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Amount with the sign of its effect on the balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Trim surrounding whitespace; blank input falls back to [`DEFAULT_CATEGORY`].
/// Case is preserved.
pub(crate) fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse a user-supplied amount. Thousands separators are tolerated;
/// negative values are rejected.
pub(crate) fn parse_amount(raw: &str) -> Result<Decimal> {
    let cleaned = raw.trim().replace(',', "");
    let amount = Decimal::from_str(&cleaned)
        .map_err(|_| FinanceError::MalformedAmount(raw.trim().to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(FinanceError::MalformedAmount(raw.trim().to_string()));
    }
    Ok(amount.normalize())
}

/// Parse a `YYYY-MM-DD` date; blank input means `today`.
pub(crate) fn parse_date(raw: &str, today: NaiveDate) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(today);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| FinanceError::MalformedDate(trimmed.to_string(), "YYYY-MM-DD"))
}
