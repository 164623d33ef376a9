use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::{BufRead, Write};

use crate::auth;
use crate::db::Database;
use crate::models::{parse_amount, parse_date, ReportWindow, TransactionType, UserId};
use crate::report;
use crate::ui::{self, Console};

pub(crate) fn as_cli<R: BufRead, W: Write>(
    args: &[String],
    db: &Database,
    console: &mut Console<R, W>,
    today: NaiveDate,
) -> Result<()> {
    let rest = &args[2..];
    match args[1].as_str() {
        "register" => cli_register(rest, db, console),
        "add" => cli_add(rest, db, console, today),
        "delete" | "rm" => cli_delete(rest, db, console),
        "report" => cli_report(rest, db, console),
        "budget" => cli_budget(rest, db, console),
        "balance" => cli_balance(rest, db, console),
        "list" | "ls" => cli_list(rest, db, console),
        "budgets" => cli_budgets(rest, db, console, today),
        "--help" | "-h" | "help" => {
            console.write_block(&usage())?;
            Ok(())
        }
        "--version" | "-V" | "version" => {
            console.say(format!("finman {}", env!("CARGO_PKG_VERSION")))?;
            Ok(())
        }
        other => {
            console.write_block(&usage())?;
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn usage() -> String {
    let lines = [
        "finman - personal finance tracker",
        "",
        "Usage: finman [command]",
        "",
        "Commands:",
        "  (none)                                    Start the interactive menu",
        "  register <user>                           Create an account",
        "  add <user> <income|expense> <category> <amount> [YYYY-MM-DD]",
        "                                            Record a transaction (default: today)",
        "  delete <user> <id>                        Delete one of your transactions",
        "  report <user> <YYYY-MM|YYYY>              Monthly or yearly report",
        "  budget <user> <category> <limit>          Set a category budget",
        "  balance <user>                            All-time income, expenses and balance",
        "  list <user> [YYYY-MM|YYYY]                List transactions",
        "  budgets <user> [YYYY-MM]                  Budget status (default: current month)",
        "  --help, -h                                Show this help",
        "  --version, -V                             Show version",
        "",
        "Every command except register asks for the account password.",
    ];
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Positional argument `index`, or a usage error naming `synopsis`.
fn arg<'a>(args: &'a [String], index: usize, synopsis: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("Usage: finman {synopsis}"))
}

/// Prompt once for `username`'s password.
fn login<R: BufRead, W: Write>(
    username: &str,
    db: &Database,
    console: &mut Console<R, W>,
) -> Result<UserId> {
    let password = console
        .prompt_password("Password: ")?
        .context("No password given")?;
    let user_id = auth::authenticate(db, username, &password)?;
    Ok(user_id)
}

fn cli_register<R: BufRead, W: Write>(
    args: &[String],
    db: &Database,
    console: &mut Console<R, W>,
) -> Result<()> {
    let username = arg(args, 0, "register <user>")?;
    let password = console
        .prompt_password("New password: ")?
        .context("No password given")?;
    let confirm = console
        .prompt_password("Confirm password: ")?
        .context("No password given")?;
    if password != confirm {
        anyhow::bail!("Passwords do not match");
    }

    auth::register(db, username, &password)?;
    console.success(&format!("Registered {}", username.trim()))?;
    Ok(())
}

fn cli_add<R: BufRead, W: Write>(
    args: &[String],
    db: &Database,
    console: &mut Console<R, W>,
    today: NaiveDate,
) -> Result<()> {
    const SYNOPSIS: &str = "add <user> <income|expense> <category> <amount> [YYYY-MM-DD]";
    let username = arg(args, 0, SYNOPSIS)?;
    let raw_kind = arg(args, 1, SYNOPSIS)?;
    let category = arg(args, 2, SYNOPSIS)?;
    let amount = parse_amount(arg(args, 3, SYNOPSIS)?)?;
    let date = parse_date(args.get(4).map(String::as_str).unwrap_or(""), today)?;
    let kind = TransactionType::parse(raw_kind).ok_or_else(|| {
        let expected: Vec<&str> = TransactionType::all().iter().map(|t| t.as_str()).collect();
        anyhow::anyhow!("Unknown type '{raw_kind}': expected {}", expected.join(" or "))
    })?;

    let user_id = login(username, db, console)?;
    let id = db
        .add_transaction(user_id, kind, category, amount, date)
        .context("Failed to record transaction")?;
    console.success(&format!(
        "{} added successfully! (ID {id})",
        ui::util::capitalize(kind.as_str())
    ))?;

    if kind == TransactionType::Expense {
        if let Some(status) = report::budget_alert(db, user_id, category, date)? {
            let theme = console.theme();
            console.say(theme.warning(&ui::budget_warning(&status)))?;
        }
    }
    Ok(())
}

fn cli_delete<R: BufRead, W: Write>(
    args: &[String],
    db: &Database,
    console: &mut Console<R, W>,
) -> Result<()> {
    const SYNOPSIS: &str = "delete <user> <id>";
    let username = arg(args, 0, SYNOPSIS)?;
    let raw_id = arg(args, 1, SYNOPSIS)?;
    let id: i64 = raw_id
        .trim()
        .parse()
        .with_context(|| format!("Invalid transaction ID: '{raw_id}'"))?;

    let user_id = login(username, db, console)?;
    db.delete_transaction(user_id, id)?;
    console.success("Transaction deleted successfully!")?;
    Ok(())
}

fn cli_report<R: BufRead, W: Write>(
    args: &[String],
    db: &Database,
    console: &mut Console<R, W>,
) -> Result<()> {
    const SYNOPSIS: &str = "report <user> <YYYY-MM|YYYY>";
    let username = arg(args, 0, SYNOPSIS)?;
    let window = ReportWindow::parse(arg(args, 1, SYNOPSIS)?)?;

    let user_id = login(username, db, console)?;
    let report = report::generate_report(db, user_id, window)?;
    let theme = console.theme();
    console.write_block(&ui::render_report(&report, &theme))?;

    let spending = db.get_spending_by_category(user_id, &window)?;
    if !spending.is_empty() {
        console.say("")?;
        console.say(theme.heading("Spending by Category:"))?;
        for (name, amount) in &spending {
            console.say(format!(
                "  {:<24} {:>12}",
                ui::util::truncate(name, 24),
                ui::util::format_amount(*amount)
            ))?;
        }
    }
    Ok(())
}

fn cli_budget<R: BufRead, W: Write>(
    args: &[String],
    db: &Database,
    console: &mut Console<R, W>,
) -> Result<()> {
    const SYNOPSIS: &str = "budget <user> <category> <limit>";
    let username = arg(args, 0, SYNOPSIS)?;
    let category = arg(args, 1, SYNOPSIS)?;
    let limit = parse_amount(arg(args, 2, SYNOPSIS)?)?;

    let user_id = login(username, db, console)?;
    db.set_budget(user_id, category, limit)
        .context("Failed to save budget")?;
    console.success(&format!(
        "Budget set for {} category.",
        crate::models::normalize_category(category)
    ))?;
    Ok(())
}

fn cli_balance<R: BufRead, W: Write>(
    args: &[String],
    db: &Database,
    console: &mut Console<R, W>,
) -> Result<()> {
    let username = arg(args, 0, "balance <user>")?;

    let user_id = login(username, db, console)?;
    let balance = report::compute_balance(db, user_id)?;
    let theme = console.theme();
    console.write_block(&ui::render_balance(&balance, &theme))?;
    Ok(())
}

fn cli_list<R: BufRead, W: Write>(
    args: &[String],
    db: &Database,
    console: &mut Console<R, W>,
) -> Result<()> {
    let username = arg(args, 0, "list <user> [YYYY-MM|YYYY]")?;
    let window = args
        .get(1)
        .map(|raw| ReportWindow::parse(raw))
        .transpose()?;

    let user_id = login(username, db, console)?;
    let txns = db.get_transactions(user_id, window.as_ref(), None)?;
    let total = db.get_transaction_count(user_id)?;
    let theme = console.theme();
    console.write_block(&ui::render_transactions(&txns, &theme))?;
    if !txns.is_empty() {
        console.say(theme.dim(&format!("{} of {total} transactions", txns.len())))?;
    }
    Ok(())
}

fn cli_budgets<R: BufRead, W: Write>(
    args: &[String],
    db: &Database,
    console: &mut Console<R, W>,
    today: NaiveDate,
) -> Result<()> {
    let username = arg(args, 0, "budgets <user> [YYYY-MM]")?;
    let window = match args.get(1) {
        Some(raw) => ReportWindow::parse(raw)?,
        None => ReportWindow::containing(today),
    };

    let user_id = login(username, db, console)?;
    let statuses = report::budget_status(db, user_id, window)?;
    let theme = console.theme();
    console.write_block(&ui::render_budget_status(&statuses, &window, &theme))?;
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
