use rust_decimal::Decimal;

use super::transaction::normalize_category;

#[derive(Debug, Clone)]
pub struct Budget {
    pub user_id: i64,
    /// Free-text; one budget per category per user.
    pub category: String,
    pub limit_amount: Decimal,
}

impl Budget {
    pub fn new(user_id: i64, category: &str, limit_amount: Decimal) -> Self {
        Self {
            user_id,
            category: normalize_category(category),
            limit_amount,
        }
    }
}
