//! Credential store: registration and login on top of the `users` table.

mod password;

use crate::db::Database;
use crate::error::{FinanceError, Result};
use crate::models::{User, UserId};

/// Create a new user. The username is trimmed; the password is taken as-is.
pub(crate) fn register(db: &Database, username: &str, password: &str) -> Result<UserId> {
    let username = username.trim();
    if username.is_empty() {
        return Err(FinanceError::EmptyUsername);
    }
    if db.get_user_by_username(username)?.is_some() {
        return Err(FinanceError::DuplicateUsername(username.to_string()));
    }

    let hash = password::hash_password(password)?;
    let id = db.insert_user(username, &hash)?;
    tracing::info!(user_id = id, username, "user registered");
    Ok(id)
}

/// Look up a user and check the password in one step.
pub(crate) fn authenticate(db: &Database, username: &str, password: &str) -> Result<UserId> {
    let user = find_user(db, username)?
        .ok_or_else(|| FinanceError::UserNotFound(username.trim().to_string()))?;
    verify(&user, password)
}

pub(crate) fn find_user(db: &Database, username: &str) -> Result<Option<User>> {
    db.get_user_by_username(username.trim())
}

/// Check `password` against the user's stored hash. No attempt limit.
pub(crate) fn verify(user: &User, password: &str) -> Result<UserId> {
    if password::verify_password(password, &user.password_hash)? {
        tracing::info!(user_id = user.id, username = %user.username, "login succeeded");
        Ok(user.id)
    } else {
        tracing::warn!(username = %user.username, "login failed: incorrect password");
        Err(FinanceError::InvalidCredential)
    }
}

#[cfg(test)]
mod tests;
