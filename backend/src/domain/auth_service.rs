//! # Auth Service
//!
//! Account registration, login/logout and password changes. Passwords are
//! stored as hex-encoded salted SHA-256 digests; the active session is
//! persisted through the storage layer so the app reopens logged in.

use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::domain::commands::auth::{
    ChangePasswordCommand, LoginCommand, LoginResult, RegisterCommand, RegisterResult,
};
use crate::domain::ids;
use crate::domain::models::user::{Session, UserAccount, UserProfile};
use crate::storage::csv::{CsvConnection, UserRepository};
use crate::storage::traits::UserStorage;

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_USERNAME_LENGTH: usize = 50;
const SALT_BYTES: usize = 16;

/// Service for account management and session handling
#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(csv_conn: CsvConnection) -> Self {
        let user_repository = UserRepository::new(csv_conn);
        Self { user_repository }
    }

    /// Register a new account and create its empty profile
    pub fn register(&self, command: RegisterCommand) -> Result<RegisterResult> {
        info!("Registering account: username={}", command.username);

        let username = command.username.trim().to_string();
        self.validate_username(&username)?;
        self.validate_password(&command.password)?;

        if self.user_repository.find_account_by_username(&username)?.is_some() {
            warn!("Username already taken: {}", username);
            return Err(anyhow::anyhow!("Username '{}' is already taken", username));
        }

        let now = Utc::now();
        let salt = generate_salt();
        let account = UserAccount {
            id: ids::generate_id("user"),
            password_hash: hash_password(&salt, &command.password)?,
            salt,
            username: username.clone(),
            email: command.email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
            created_at: now,
            updated_at: now,
        };

        self.user_repository.store_account(&account)?;
        self.user_repository
            .store_profile(&UserProfile::empty(&account.id, &username))?;

        info!("Registered account: {} with ID: {}", username, account.id);

        Ok(RegisterResult {
            account,
            success_message: format!("Account '{}' created successfully", username),
        })
    }

    /// Log in with username and password, persisting the session
    pub fn login(&self, command: LoginCommand) -> Result<LoginResult> {
        info!("Login attempt: username={}", command.username);

        let account = self
            .user_repository
            .find_account_by_username(command.username.trim())?
            .ok_or_else(|| anyhow::anyhow!("Invalid username or password"))?;

        if hash_password(&account.salt, &command.password)? != account.password_hash {
            warn!("Wrong password for username: {}", command.username);
            return Err(anyhow::anyhow!("Invalid username or password"));
        }

        self.user_repository.set_active_user(&account.id)?;

        info!("Logged in: {} with ID: {}", account.username, account.id);

        Ok(LoginResult {
            session: Session {
                user_id: account.id,
                username: account.username.clone(),
            },
            success_message: format!("Welcome back, {}!", account.username),
        })
    }

    /// Log out and clear the persisted session
    pub fn logout(&self) -> Result<()> {
        info!("Logging out");
        self.user_repository.clear_active_user()
    }

    /// The persisted session, if a user is logged in
    pub fn current_session(&self) -> Result<Option<Session>> {
        let user_id = match self.user_repository.get_active_user()? {
            Some(id) => id,
            None => return Ok(None),
        };

        match self.user_repository.get_account(&user_id)? {
            Some(account) => Ok(Some(Session {
                user_id: account.id,
                username: account.username,
            })),
            None => {
                // Stale global config pointing at a deleted account
                warn!("Active user ID exists but account not found: {}", user_id);
                self.user_repository.clear_active_user()?;
                Ok(None)
            }
        }
    }

    /// Change a password after verifying the current one
    pub fn change_password(&self, command: ChangePasswordCommand) -> Result<()> {
        info!("Changing password for user: {}", command.user_id);

        let mut account = self
            .user_repository
            .get_account(&command.user_id)?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {}", command.user_id))?;

        if hash_password(&account.salt, &command.current_password)? != account.password_hash {
            return Err(anyhow::anyhow!("Current password is incorrect"));
        }

        self.validate_password(&command.new_password)?;

        let salt = generate_salt();
        account.password_hash = hash_password(&salt, &command.new_password)?;
        account.salt = salt;
        account.updated_at = Utc::now();

        self.user_repository.update_account(&account)?;

        info!("Password changed for user: {}", command.user_id);
        Ok(())
    }

    /// Get an account by ID
    pub fn get_account(&self, user_id: &str) -> Result<Option<UserAccount>> {
        self.user_repository.get_account(user_id)
    }

    fn validate_username(&self, username: &str) -> Result<()> {
        if username.is_empty() {
            return Err(anyhow::anyhow!("Username cannot be empty"));
        }
        if username.len() > MAX_USERNAME_LENGTH {
            return Err(anyhow::anyhow!(
                "Username cannot be longer than {} characters",
                MAX_USERNAME_LENGTH
            ));
        }
        Ok(())
    }

    fn validate_password(&self, password: &str) -> Result<()> {
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(anyhow::anyhow!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ));
        }
        Ok(())
    }
}

fn generate_salt() -> String {
    let bytes: [u8; SALT_BYTES] = rand::thread_rng().gen();
    hex::encode(bytes)
}

fn hash_password(salt_hex: &str, password: &str) -> Result<String> {
    let salt = hex::decode(salt_hex).context("Invalid salt encoding")?;
    let mut hasher = Sha256::new();
    hasher.update(&salt);
    hasher.update(password.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup_test() -> (AuthService, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let conn = CsvConnection::new(temp_dir.path()).unwrap();
        (AuthService::new(conn), temp_dir)
    }

    fn register_command(username: &str) -> RegisterCommand {
        RegisterCommand {
            username: username.to_string(),
            password: "correct horse".to_string(),
            email: None,
        }
    }

    #[test]
    fn test_register_creates_account_and_profile() {
        let (service, _temp_dir) = setup_test();
        let result = service.register(register_command("anna")).unwrap();

        assert_eq!(result.account.username, "anna");
        assert_ne!(result.account.password_hash, "correct horse");
        assert!(service
            .user_repository
            .get_profile(&result.account.id)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_register_rejects_duplicate_username() {
        let (service, _temp_dir) = setup_test();
        service.register(register_command("anna")).unwrap();
        assert!(service.register(register_command("anna")).is_err());
    }

    #[test]
    fn test_register_rejects_short_password() {
        let (service, _temp_dir) = setup_test();
        let command = RegisterCommand {
            password: "short".to_string(),
            ..register_command("anna")
        };
        assert!(service.register(command).is_err());
    }

    #[test]
    fn test_login_and_session_round_trip() {
        let (service, _temp_dir) = setup_test();
        let registered = service.register(register_command("anna")).unwrap();

        assert!(service.current_session().unwrap().is_none());

        let result = service
            .login(LoginCommand {
                username: "anna".to_string(),
                password: "correct horse".to_string(),
            })
            .unwrap();
        assert_eq!(result.session.user_id, registered.account.id);

        let session = service.current_session().unwrap().unwrap();
        assert_eq!(session.username, "anna");

        service.logout().unwrap();
        assert!(service.current_session().unwrap().is_none());
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let (service, _temp_dir) = setup_test();
        service.register(register_command("anna")).unwrap();

        let result = service.login(LoginCommand {
            username: "anna".to_string(),
            password: "not the password".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_change_password() {
        let (service, _temp_dir) = setup_test();
        let registered = service.register(register_command("anna")).unwrap();

        service
            .change_password(ChangePasswordCommand {
                user_id: registered.account.id.clone(),
                current_password: "correct horse".to_string(),
                new_password: "battery staple".to_string(),
            })
            .unwrap();

        assert!(service
            .login(LoginCommand {
                username: "anna".to_string(),
                password: "correct horse".to_string(),
            })
            .is_err());
        assert!(service
            .login(LoginCommand {
                username: "anna".to_string(),
                password: "battery staple".to_string(),
            })
            .is_ok());
    }

    #[test]
    fn test_change_password_requires_current() {
        let (service, _temp_dir) = setup_test();
        let registered = service.register(register_command("anna")).unwrap();

        let result = service.change_password(ChangePasswordCommand {
            user_id: registered.account.id,
            current_password: "wrong".to_string(),
            new_password: "battery staple".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_salted_hashes_differ_between_accounts() {
        let (service, _temp_dir) = setup_test();
        let first = service.register(register_command("anna")).unwrap();
        let second = service.register(register_command("berta")).unwrap();
        assert_ne!(first.account.password_hash, second.account.password_hash);
    }
}
