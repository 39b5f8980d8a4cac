//! Account store gating the management commands.
//!
//! Mirrors the original single-user login flow: plain-equality password
//! check, a `currentUser` record and an `isLoggedIn` flag. This gates
//! access to local data for convenience; it is not a security boundary.

use crate::model::user::User;
use crate::repo::kv_repo::{keys, KeyValueRepository};
use crate::service::{StoreError, StoreResult};
use log::info;

/// Store owning registered accounts and the login session keys.
pub struct AccountStore<R: KeyValueRepository> {
    repo: R,
    users: Vec<User>,
}

impl<R: KeyValueRepository> AccountStore<R> {
    /// Loads registered accounts.
    pub fn load(repo: R) -> StoreResult<Self> {
        let users = repo.load_collection(keys::USERS)?;
        Ok(Self { repo, users })
    }

    /// Registers a new account and makes it current.
    ///
    /// Emails are trimmed and lowercased before the uniqueness check.
    /// Registration does not log the account in.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> StoreResult<User> {
        let name = name.trim();
        let email = email.trim().to_lowercase();
        if name.is_empty() {
            return Err(StoreError::MissingField("name"));
        }
        if email.is_empty() {
            return Err(StoreError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(StoreError::MissingField("password"));
        }
        if self.users.iter().any(|user| user.email == email) {
            return Err(StoreError::Duplicate(format!("account `{email}`")));
        }

        let user = User {
            name: name.to_string(),
            email,
            password: password.to_string(),
        };
        self.users.push(user.clone());
        self.repo.save_collection(keys::USERS, &self.users)?;
        self.repo.save_record(keys::CURRENT_USER, Some(&user))?;

        info!(
            "event=account_register module=account_store status=ok email={}",
            user.email
        );
        Ok(user)
    }

    /// Logs in with plain-equality credential matching.
    pub fn login(&self, email: &str, password: &str) -> StoreResult<User> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .iter()
            .find(|user| user.email == email && user.password == password)
            .ok_or(StoreError::InvalidCredentials)?
            .clone();

        self.repo.save_record(keys::CURRENT_USER, Some(&user))?;
        self.repo.save_record(keys::IS_LOGGED_IN, Some(&true))?;

        info!(
            "event=account_login module=account_store status=ok email={}",
            user.email
        );
        Ok(user)
    }

    /// Clears the session keys.
    pub fn logout(&self) -> StoreResult<()> {
        self.repo.save_record::<User>(keys::CURRENT_USER, None)?;
        self.repo.save_record(keys::IS_LOGGED_IN, Some(&false))?;
        info!("event=account_logout module=account_store status=ok");
        Ok(())
    }

    /// Current account, if any.
    pub fn current_user(&self) -> StoreResult<Option<User>> {
        let user = self.repo.load_record(keys::CURRENT_USER)?;
        Ok(user)
    }

    /// Whether the session gate is open: a current account exists and the
    /// logged-in flag is set.
    pub fn is_logged_in(&self) -> StoreResult<bool> {
        let flag: Option<bool> = self.repo.load_record(keys::IS_LOGGED_IN)?;
        let current: Option<User> = self.repo.load_record(keys::CURRENT_USER)?;
        Ok(flag.unwrap_or(false) && current.is_some())
    }
}
