mod budget;
mod transaction;
mod user;
mod window;

pub use budget::Budget;
pub(crate) use transaction::{normalize_category, parse_amount, parse_date, TransactionId, DATE_FORMAT};
pub use transaction::{Transaction, TransactionType};
pub use user::User;
pub(crate) use user::UserId;
pub use window::ReportWindow;

#[cfg(test)]
mod tests;
