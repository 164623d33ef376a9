mod schema;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::{FinanceError, Result};
use crate::models::*;

/// Handle over the SQLite store. Opened once and passed to every operation.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            tracing::info!(version = schema::CURRENT_VERSION, "created database schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tracing::info!(from_version, "applying migration");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Users ─────────────────────────────────────────────────

    pub(crate) fn insert_user(&self, username: &str, password_hash: &str) -> Result<UserId> {
        let result = self.conn.execute(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
            params![username, password_hash, chrono::Utc::now().to_rfc3339()],
        );
        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(FinanceError::DuplicateUsername(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, password_hash FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    pub(crate) fn get_user_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn add_transaction(
        &self,
        user_id: UserId,
        kind: TransactionType,
        category: &str,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<TransactionId> {
        let txn = Transaction::new(user_id, kind, category, amount, date);
        self.insert_transaction(&txn)
    }

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<TransactionId> {
        if txn.amount.is_sign_negative() && !txn.amount.is_zero() {
            return Err(FinanceError::MalformedAmount(txn.amount.to_string()));
        }
        // Every later sum over this user's rows must stay representable.
        checked_total(self.sum_by_type(txn.user_id, txn.kind)?, txn.amount)?;
        self.conn.execute(
            "INSERT INTO transactions (user_id, type, category, amount, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                txn.user_id,
                txn.kind.as_str(),
                txn.category,
                txn.amount.to_string(),
                txn.date.format(DATE_FORMAT).to_string(),
                txn.created_at,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(user_id = txn.user_id, id, kind = %txn.kind, "transaction added");
        Ok(id)
    }

    /// Delete only when `id` belongs to `user_id`. A missing row and a row
    /// owned by someone else produce the same error.
    pub(crate) fn delete_transaction(&self, user_id: UserId, id: TransactionId) -> Result<()> {
        let affected = self.conn.execute(
            "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if affected == 0 {
            tracing::warn!(user_id, id, "delete matched no owned transaction");
            return Err(FinanceError::RecordNotFoundOrNotOwned(id));
        }
        tracing::info!(user_id, id, "transaction deleted");
        Ok(())
    }

    /// The user's transactions, newest first.
    pub(crate) fn get_transactions(
        &self,
        user_id: UserId,
        window: Option<&ReportWindow>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>> {
        let mut sql = String::from(
            "SELECT id, user_id, type, category, amount, date, created_at
             FROM transactions WHERE user_id = ?1",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(user_id)];

        if let Some(w) = window {
            sql.push_str(&format!(" AND date LIKE ?{}", param_values.len() + 1));
            param_values.push(Box::new(format!("{}%", w.date_prefix())));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        if let Some(l) = limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            Ok(Transaction {
                id: Some(row.get(0)?),
                user_id: row.get(1)?,
                kind: type_column(row, 2)?,
                category: row.get(3)?,
                amount: decimal_column(row, 4)?,
                date: date_column(row, 5)?,
                created_at: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_transaction_count(&self, user_id: UserId) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?)
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn set_budget(&self, user_id: UserId, category: &str, limit: Decimal) -> Result<()> {
        let budget = Budget::new(user_id, category, limit);
        self.upsert_budget(&budget)
    }

    pub(crate) fn upsert_budget(&self, budget: &Budget) -> Result<()> {
        if budget.limit_amount.is_sign_negative() && !budget.limit_amount.is_zero() {
            return Err(FinanceError::MalformedAmount(budget.limit_amount.to_string()));
        }
        self.conn.execute(
            "INSERT INTO budgets (user_id, category, limit_amount)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, category) DO UPDATE SET limit_amount = ?3",
            params![
                budget.user_id,
                budget.category,
                budget.limit_amount.to_string(),
            ],
        )?;
        tracing::info!(user_id = budget.user_id, category = %budget.category, "budget set");
        Ok(())
    }

    pub(crate) fn get_budgets(&self, user_id: UserId) -> Result<Vec<Budget>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, category, limit_amount FROM budgets
             WHERE user_id = ?1 ORDER BY category",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(Budget {
                user_id: row.get(0)?,
                category: row.get(1)?,
                limit_amount: decimal_column(row, 2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Analytics ─────────────────────────────────────────────
    //
    // Amounts are stored as decimal TEXT; SQLite's SUM would go through
    // REAL, so rows are filtered in SQL and summed as `Decimal`.

    /// Per-type totals of the user's transactions dated inside `window`.
    /// Types without rows are absent from the map.
    pub(crate) fn sum_by_type_in_window(
        &self,
        user_id: UserId,
        window: &ReportWindow,
    ) -> Result<BTreeMap<TransactionType, Decimal>> {
        let mut stmt = self.conn.prepare(
            "SELECT type, amount FROM transactions
             WHERE user_id = ?1 AND date LIKE ?2
             ORDER BY type",
        )?;
        let rows = stmt.query_map(params![user_id, format!("{}%", window.date_prefix())], |row| {
            Ok((type_column(row, 0)?, decimal_column(row, 1)?))
        })?;

        let mut totals: BTreeMap<TransactionType, Decimal> = BTreeMap::new();
        for row in rows {
            let (kind, amount) = row?;
            let total = totals.entry(kind).or_insert(Decimal::ZERO);
            *total = checked_total(*total, amount)?;
        }
        tracing::debug!(user_id, %window, groups = totals.len(), "summed by type in window");
        Ok(totals)
    }

    /// All-time total for one type; zero when the user has no such rows.
    pub(crate) fn sum_by_type(&self, user_id: UserId, kind: TransactionType) -> Result<Decimal> {
        let mut stmt = self
            .conn
            .prepare("SELECT amount FROM transactions WHERE user_id = ?1 AND type = ?2")?;
        let rows = stmt.query_map(params![user_id, kind.as_str()], |row| decimal_column(row, 0))?;

        let mut total = Decimal::ZERO;
        for amount in rows {
            total = checked_total(total, amount?)?;
        }
        tracing::debug!(user_id, %kind, %total, "summed by type");
        Ok(total)
    }

    /// Expense totals per category inside `window`, largest first.
    pub(crate) fn get_spending_by_category(
        &self,
        user_id: UserId,
        window: &ReportWindow,
    ) -> Result<Vec<(String, Decimal)>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, amount FROM transactions
             WHERE user_id = ?1 AND type = 'expense' AND date LIKE ?2",
        )?;
        let rows = stmt.query_map(params![user_id, format!("{}%", window.date_prefix())], |row| {
            Ok((row.get::<_, String>(0)?, decimal_column(row, 1)?))
        })?;

        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for row in rows {
            let (category, amount) = row?;
            let total = totals.entry(category).or_insert(Decimal::ZERO);
            *total = checked_total(*total, amount)?;
        }
        let mut spending: Vec<(String, Decimal)> = totals.into_iter().collect();
        spending.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(spending)
    }
}

fn checked_total(total: Decimal, amount: Decimal) -> Result<Decimal> {
    total.checked_add(amount).ok_or(FinanceError::AmountOverflow)
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn type_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<TransactionType> {
    let raw: String = row.get(idx)?;
    TransactionType::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unknown transaction type: {raw}").into(),
        )
    })
}
