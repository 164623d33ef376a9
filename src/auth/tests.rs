#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn test_register_then_authenticate() {
    let db = Database::open_in_memory().unwrap();
    let id = register(&db, "alice", "pw1").unwrap();
    assert_eq!(authenticate(&db, "alice", "pw1").unwrap(), id);
}

#[test]
fn test_password_is_not_stored_in_plaintext() {
    let db = Database::open_in_memory().unwrap();
    register(&db, "alice", "pw1").unwrap();
    let user = db.get_user_by_username("alice").unwrap().unwrap();
    assert_ne!(user.password_hash, "pw1");
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[test]
fn test_same_password_gets_distinct_salts() {
    let db = Database::open_in_memory().unwrap();
    register(&db, "alice", "shared").unwrap();
    register(&db, "bob", "shared").unwrap();
    let a = db.get_user_by_username("alice").unwrap().unwrap();
    let b = db.get_user_by_username("bob").unwrap().unwrap();
    assert_ne!(a.password_hash, b.password_hash);
}

#[test]
fn test_duplicate_registration_keeps_original_credentials() {
    let db = Database::open_in_memory().unwrap();
    let id = register(&db, "alice", "pw1").unwrap();

    let err = register(&db, "alice", "pw2").unwrap_err();
    assert!(matches!(err, FinanceError::DuplicateUsername(name) if name == "alice"));

    assert_eq!(authenticate(&db, "alice", "pw1").unwrap(), id);
    assert!(matches!(
        authenticate(&db, "alice", "pw2"),
        Err(FinanceError::InvalidCredential)
    ));
}

#[test]
fn test_register_trims_username() {
    let db = Database::open_in_memory().unwrap();
    let id = register(&db, "  alice ", "pw1").unwrap();
    assert_eq!(authenticate(&db, "alice", "pw1").unwrap(), id);
    assert!(matches!(
        register(&db, "alice", "x"),
        Err(FinanceError::DuplicateUsername(_))
    ));
}

#[test]
fn test_register_rejects_blank_username() {
    let db = Database::open_in_memory().unwrap();
    assert!(matches!(register(&db, "   ", "pw"), Err(FinanceError::EmptyUsername)));
    assert_eq!(db.get_user_count().unwrap(), 0);
}

#[test]
fn test_unknown_user() {
    let db = Database::open_in_memory().unwrap();
    register(&db, "alice", "pw1").unwrap();
    assert!(matches!(
        authenticate(&db, "mallory", "pw1"),
        Err(FinanceError::UserNotFound(name)) if name == "mallory"
    ));
}

#[test]
fn test_wrong_password_never_succeeds() {
    let db = Database::open_in_memory().unwrap();
    register(&db, "alice", "pw1").unwrap();
    for attempt in ["pw", "PW1", "pw1 ", "", "pw12"] {
        assert!(
            matches!(
                authenticate(&db, "alice", attempt),
                Err(FinanceError::InvalidCredential)
            ),
            "password {attempt:?} should be rejected"
        );
    }
    // Repeated failures do not lock the account
    assert!(authenticate(&db, "alice", "pw1").is_ok());
}

#[test]
fn test_find_then_verify() {
    let db = Database::open_in_memory().unwrap();
    let id = register(&db, "alice", "pw1").unwrap();

    let user = find_user(&db, "alice").unwrap().unwrap();
    assert!(matches!(verify(&user, "nope"), Err(FinanceError::InvalidCredential)));
    assert_eq!(verify(&user, "pw1").unwrap(), id);
    assert!(find_user(&db, "bob").unwrap().is_none());
}

#[test]
fn test_corrupt_hash_is_an_error_not_a_mismatch() {
    let user = User {
        id: 1,
        username: "alice".into(),
        password_hash: "not-a-phc-string".into(),
    };
    assert!(matches!(verify(&user, "pw1"), Err(FinanceError::PasswordHash(_))));
}
