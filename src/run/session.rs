use anyhow::Result;
use chrono::NaiveDate;
use std::io::{self, BufRead, Write};

use crate::auth;
use crate::db::Database;
use crate::error::FinanceError;
use crate::models::{parse_amount, parse_date, ReportWindow, TransactionType, UserId};
use crate::report;
use crate::ui::{self, Console};

/// Rows shown by "List Transactions" when no window is given.
const RECENT_LIMIT: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionState {
    Anonymous,
    Authenticated { user_id: UserId, username: String },
}

/// Whether the menu loop keeps going. Input running out ends the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub(crate) struct Session<'a, R, W> {
    db: &'a Database,
    console: Console<R, W>,
    state: SessionState,
    today: NaiveDate,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub(crate) fn new(db: &'a Database, console: Console<R, W>, today: NaiveDate) -> Self {
        Self {
            db,
            console,
            state: SessionState::Anonymous,
            today,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &SessionState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn into_console(self) -> Console<R, W> {
        self.console
    }

    pub(crate) fn run(&mut self) -> Result<()> {
        let banner = self.console.theme().heading("Welcome to Personal Finance Manager");
        self.console.say(banner)?;
        if self.db.get_user_count()? == 0 {
            let hint = self.console.theme().dim("No accounts yet. Register to get started.");
            self.console.say(hint)?;
        }

        loop {
            let flow = match self.state.clone() {
                SessionState::Anonymous => self.anonymous_menu()?,
                SessionState::Authenticated { user_id, .. } => self.account_menu(user_id)?,
            };
            if flow == Flow::Exit {
                break;
            }
        }
        tracing::debug!("session ended");
        Ok(())
    }

    // ── Menus ────────────────────────────────────────────────

    fn anonymous_menu(&mut self) -> Result<Flow> {
        self.console.say("1: Register\n2: Login")?;
        let Some(choice) = self.console.prompt("Choose an option: ")? else {
            return Ok(Flow::Exit);
        };
        match choice.trim() {
            "1" => self.register(),
            "2" => self.login(),
            other => {
                self.console.error(format!("Unknown option: {other}"))?;
                Ok(Flow::Continue)
            }
        }
    }

    fn account_menu(&mut self, user_id: UserId) -> Result<Flow> {
        self.console.say(
            "1: Add Income\n2: Add Expense\n3: Delete Transaction\n4: Generate Report\n\
             5: Set Budget\n6: Balance\n7: Logout\n8: List Transactions\n9: Budget Status",
        )?;
        let Some(choice) = self.console.prompt("Choose an option: ")? else {
            return Ok(Flow::Exit);
        };
        match choice.trim() {
            "1" => self.add_transaction(user_id, TransactionType::Income),
            "2" => self.add_transaction(user_id, TransactionType::Expense),
            "3" => self.delete_transaction(user_id),
            "4" => self.generate_report(user_id),
            "5" => self.set_budget(user_id),
            "6" => self.show_balance(user_id),
            "7" => self.logout(),
            "8" => self.list_transactions(user_id),
            "9" => self.budget_status(user_id),
            other => {
                self.console.error(format!("Unknown option: {other}"))?;
                Ok(Flow::Continue)
            }
        }
    }

    // ── Anonymous actions ────────────────────────────────────

    fn register(&mut self) -> Result<Flow> {
        self.console.say("Register a new account")?;
        let Some(username) = self.console.prompt("Enter a new username: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(password) = self.console.prompt_password("Enter a new password: ")? else {
            return Ok(Flow::Exit);
        };

        match auth::register(self.db, &username, &password) {
            Ok(user_id) => {
                let username = username.trim().to_string();
                self.console
                    .success(&format!("Registration successful! Welcome, {username}!"))?;
                self.state = SessionState::Authenticated { user_id, username };
            }
            Err(FinanceError::DuplicateUsername(_)) => {
                self.console
                    .error("Username already exists! Please choose a different one.")?;
            }
            Err(e) => self.report_failure(&e)?,
        }
        Ok(Flow::Continue)
    }

    /// Re-prompts for the username until it exists, then for the password
    /// until it matches.
    fn login(&mut self) -> Result<Flow> {
        self.console.say("Login to your account")?;
        let user = loop {
            let Some(username) = self.console.prompt("Enter username: ")? else {
                return Ok(Flow::Exit);
            };
            match auth::find_user(self.db, &username) {
                Ok(Some(user)) => break user,
                Ok(None) => {
                    self.console
                        .error("Username not found. Please enter a valid username.")?;
                }
                Err(e) => {
                    self.report_failure(&e)?;
                    return Ok(Flow::Continue);
                }
            }
        };

        loop {
            let Some(password) = self.console.prompt_password("Enter password: ")? else {
                return Ok(Flow::Exit);
            };
            match auth::verify(&user, &password) {
                Ok(user_id) => {
                    self.console.success("Login successful!")?;
                    self.state = SessionState::Authenticated {
                        user_id,
                        username: user.username,
                    };
                    return Ok(Flow::Continue);
                }
                Err(FinanceError::InvalidCredential) => {
                    self.console.error("Incorrect password. Please try again.")?;
                }
                Err(e) => {
                    self.report_failure(&e)?;
                    return Ok(Flow::Continue);
                }
            }
        }
    }

    // ── Authenticated actions ────────────────────────────────

    fn add_transaction(&mut self, user_id: UserId, kind: TransactionType) -> Result<Flow> {
        self.console.say(format!("Adding a new {kind}"))?;
        let Some(category) = self
            .console
            .prompt("Enter the category (e.g., Food, Rent, Salary): ")?
        else {
            return Ok(Flow::Exit);
        };
        let Some(raw_amount) = self.console.prompt("Enter the amount: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(amount) = self.outcome(parse_amount(&raw_amount))? else {
            return Ok(Flow::Continue);
        };
        let Some(raw_date) = self
            .console
            .prompt(&format!("Enter the date (YYYY-MM-DD, default: {}): ", self.today))?
        else {
            return Ok(Flow::Exit);
        };
        let Some(date) = self.outcome(parse_date(&raw_date, self.today))? else {
            return Ok(Flow::Continue);
        };

        let added = self
            .db
            .add_transaction(user_id, kind, &category, amount, date);
        if let Some(id) = self.outcome(added)? {
            let label = ui::util::capitalize(kind.as_str());
            self.console
                .success(&format!("{label} added successfully! (ID {id})"))?;
            if kind == TransactionType::Expense {
                let alert = report::budget_alert(self.db, user_id, &category, date);
                if let Some(Some(status)) = self.outcome(alert)? {
                    let theme = self.console.theme();
                    self.console.say(theme.warning(&ui::budget_warning(&status)))?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn delete_transaction(&mut self, user_id: UserId) -> Result<Flow> {
        let Some(raw_id) = self.console.prompt("Enter the transaction ID to delete: ")? else {
            return Ok(Flow::Exit);
        };
        let Ok(id) = raw_id.trim().parse::<i64>() else {
            self.console
                .error(format!("Invalid transaction ID: '{}'", raw_id.trim()))?;
            return Ok(Flow::Continue);
        };

        let deleted = self.db.delete_transaction(user_id, id);
        if self.outcome(deleted)?.is_some() {
            self.console.success("Transaction deleted successfully!")?;
        }
        Ok(Flow::Continue)
    }

    fn generate_report(&mut self, user_id: UserId) -> Result<Flow> {
        let Some(period) = self.console.prompt("Enter period (monthly/yearly): ")? else {
            return Ok(Flow::Exit);
        };
        let window = match period.trim().to_lowercase().as_str() {
            "monthly" | "m" => {
                let Some(month) = self.console.prompt("Enter month (MM): ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(year) = self.console.prompt("Enter year (YYYY): ")? else {
                    return Ok(Flow::Exit);
                };
                ReportWindow::parse_month_year(&month, &year)
            }
            "yearly" | "y" => {
                let Some(year) = self.console.prompt("Enter year (YYYY): ")? else {
                    return Ok(Flow::Exit);
                };
                ReportWindow::parse_year(&year)
            }
            other => {
                self.console.error(format!(
                    "Unknown period '{other}': expected monthly or yearly"
                ))?;
                return Ok(Flow::Continue);
            }
        };
        let Some(window) = self.outcome(window)? else {
            return Ok(Flow::Continue);
        };

        let generated = report::generate_report(self.db, user_id, window);
        if let Some(report) = self.outcome(generated)? {
            let theme = self.console.theme();
            self.console.write_block(&ui::render_report(&report, &theme))?;
        }
        Ok(Flow::Continue)
    }

    fn set_budget(&mut self, user_id: UserId) -> Result<Flow> {
        self.console.say("Set Budget for a Category")?;
        let Some(category) = self
            .console
            .prompt("Enter category for budget (e.g., Food): ")?
        else {
            return Ok(Flow::Exit);
        };
        let Some(raw_limit) = self.console.prompt("Enter budget limit: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(limit) = self.outcome(parse_amount(&raw_limit))? else {
            return Ok(Flow::Continue);
        };

        let saved = self.db.set_budget(user_id, &category, limit);
        if self.outcome(saved)?.is_some() {
            let category = crate::models::normalize_category(&category);
            self.console
                .success(&format!("Budget set for {category} category."))?;
        }
        Ok(Flow::Continue)
    }

    fn show_balance(&mut self, user_id: UserId) -> Result<Flow> {
        let computed = report::compute_balance(self.db, user_id);
        if let Some(balance) = self.outcome(computed)? {
            let theme = self.console.theme();
            self.console
                .write_block(&ui::render_balance(&balance, &theme))?;
        }
        Ok(Flow::Continue)
    }

    fn logout(&mut self) -> Result<Flow> {
        if let SessionState::Authenticated { user_id, .. } = &self.state {
            tracing::info!(user_id = *user_id, "logged out");
        }
        self.state = SessionState::Anonymous;
        self.console.say("Logged out.")?;
        Ok(Flow::Continue)
    }

    fn list_transactions(&mut self, user_id: UserId) -> Result<Flow> {
        let Some(raw) = self
            .console
            .prompt("Filter by month (YYYY-MM) or year (YYYY), blank for recent: ")?
        else {
            return Ok(Flow::Exit);
        };

        let (window, limit) = if raw.trim().is_empty() {
            (None, Some(RECENT_LIMIT))
        } else {
            let Some(window) = self.outcome(ReportWindow::parse(&raw))? else {
                return Ok(Flow::Continue);
            };
            (Some(window), None)
        };

        let listed = self.db.get_transactions(user_id, window.as_ref(), limit);
        if let Some(txns) = self.outcome(listed)? {
            let theme = self.console.theme();
            self.console
                .write_block(&ui::render_transactions(&txns, &theme))?;
        }
        Ok(Flow::Continue)
    }

    fn budget_status(&mut self, user_id: UserId) -> Result<Flow> {
        let Some(raw) = self
            .console
            .prompt("Enter month (YYYY-MM, blank for current): ")?
        else {
            return Ok(Flow::Exit);
        };
        let window = if raw.trim().is_empty() {
            Ok(ReportWindow::containing(self.today))
        } else {
            ReportWindow::parse(&raw)
        };
        let Some(window) = self.outcome(window)? else {
            return Ok(Flow::Continue);
        };

        let computed = report::budget_status(self.db, user_id, window);
        if let Some(statuses) = self.outcome(computed)? {
            let theme = self.console.theme();
            self.console
                .write_block(&ui::render_budget_status(&statuses, &window, &theme))?;
        }
        Ok(Flow::Continue)
    }

    // ── Error reporting ──────────────────────────────────────

    /// Surface a failed operation to the user; the session carries on.
    fn outcome<T>(&mut self, result: crate::error::Result<T>) -> io::Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                self.report_failure(&e)?;
                Ok(None)
            }
        }
    }

    fn report_failure(&mut self, err: &FinanceError) -> io::Result<()> {
        match err {
            FinanceError::Storage(_) | FinanceError::PasswordHash(_) => {
                tracing::error!(error = %err, "operation failed");
                self.console.error(format!("An error occurred: {err}"))
            }
            _ => self.console.error(err),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
