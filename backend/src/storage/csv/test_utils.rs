//! Shared fixtures for repository tests.

use chrono::Utc;
use tempfile::TempDir;

use super::connection::CsvConnection;
use super::user_repository::UserRepository;
use crate::domain::models::user::UserAccount;
use crate::storage::traits::UserStorage;

/// A connection rooted in a fresh temp directory
pub fn test_connection() -> (CsvConnection, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let connection = CsvConnection::new(temp_dir.path()).expect("Failed to create connection");
    (connection, temp_dir)
}

/// An account with a fixed hash/salt, good enough for storage tests
pub fn test_account(id: &str, username: &str) -> UserAccount {
    let now = Utc::now();
    UserAccount {
        id: id.to_string(),
        username: username.to_string(),
        password_hash: "ab".repeat(32),
        salt: "cd".repeat(16),
        email: None,
        created_at: now,
        updated_at: now,
    }
}

/// Store an account so repositories keyed by user ID can resolve it
pub fn seed_user(connection: &CsvConnection, id: &str, username: &str) -> UserAccount {
    let repo = UserRepository::new(connection.clone());
    let account = test_account(id, username);
    repo.store_account(&account).expect("Failed to seed user");
    account
}
