pub(crate) type UserId = i64;

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}
