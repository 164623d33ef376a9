use chrono::{Datelike, NaiveDate};

use crate::error::{FinanceError, Result};

/// Reporting time range. Matching is done on the stored ISO date's prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportWindow {
    Month { year: i32, month: u32 },
    Year(i32),
}

impl ReportWindow {
    pub(crate) fn month(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(FinanceError::MalformedDate(format!("{month}"), "a month 01-12"));
        }
        check_year(year)?;
        Ok(Self::Month { year, month })
    }

    pub(crate) fn year(year: i32) -> Result<Self> {
        check_year(year)?;
        Ok(Self::Year(year))
    }

    /// Build from separate month (`MM`) and year (`YYYY`) inputs.
    pub(crate) fn parse_month_year(month: &str, year: &str) -> Result<Self> {
        let m = month
            .trim()
            .parse::<u32>()
            .map_err(|_| FinanceError::MalformedDate(month.trim().to_string(), "a month 01-12"))?;
        let y = parse_year(year)?;
        Self::month(y, m)
    }

    /// Accepts `YYYY-MM` or `YYYY`.
    pub(crate) fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.split_once('-') {
            Some((y, m)) => Self::parse_month_year(m, y),
            None => Self::parse_year(trimmed),
        }
    }

    /// Accepts `YYYY` only.
    pub(crate) fn parse_year(s: &str) -> Result<Self> {
        Self::year(parse_year(s)?)
    }

    /// Window for the month containing `date`.
    pub(crate) fn containing(date: NaiveDate) -> Self {
        Self::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Prefix every stored date inside the window starts with.
    pub(crate) fn date_prefix(&self) -> String {
        match self {
            Self::Month { year, month } => format!("{year:04}-{month:02}"),
            Self::Year(year) => format!("{year:04}"),
        }
    }

    pub(crate) fn period_name(&self) -> &'static str {
        match self {
            Self::Month { .. } => "Monthly",
            Self::Year(_) => "Yearly",
        }
    }
}

impl std::fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date_prefix())
    }
}

fn parse_year(raw: &str) -> Result<i32> {
    let trimmed = raw.trim();
    if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FinanceError::MalformedDate(trimmed.to_string(), "a year YYYY"));
    }
    trimmed
        .parse::<i32>()
        .map_err(|_| FinanceError::MalformedDate(trimmed.to_string(), "a year YYYY"))
}

fn check_year(year: i32) -> Result<()> {
    if (1..=9999).contains(&year) {
        Ok(())
    } else {
        Err(FinanceError::MalformedDate(format!("{year}"), "a year YYYY"))
    }
}
