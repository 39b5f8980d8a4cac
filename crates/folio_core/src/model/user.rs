//! Account records for the dashboard gate.
//!
//! Accounts exist to keep management commands behind an explicit login,
//! mirroring the original single-user setup. This is a convenience gate
//! for local data, not a security boundary; passwords are stored as-is.

use serde::{Deserialize, Serialize};

/// Registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    /// Stored trimmed and lowercased; uniqueness key for registration.
    pub email: String,
    pub password: String,
}
