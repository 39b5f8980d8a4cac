//! Core use-case stores.
//!
//! # Responsibility
//! - Orchestrate repository persistence into use-case level store APIs.
//! - Keep CLI/front-end layers decoupled from storage details.
//!
//! # Invariants
//! - Every mutator persists the affected collections before returning.
//! - Store APIs surface semantic errors; repository/transport errors pass
//!   through unchanged.

use crate::repo::kv_repo::RepoError;
use chrono::Local;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_store;
pub mod message_store;
pub mod project_store;
pub mod skill_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// User-facing store error taxonomy.
///
/// All variants except `Repo` describe rejected operations that left state
/// untouched; none of them are fatal.
#[derive(Debug)]
pub enum StoreError {
    /// Required field is blank; names the first offending field.
    MissingField(&'static str),
    /// A matching record already exists; carries a short descriptor.
    Duplicate(String),
    /// Target record (or restorable deletion) does not exist.
    NotFound(String),
    /// Import payload rejected before any merge was applied.
    MalformedImport(String),
    /// Login attempt with unknown email or wrong password.
    InvalidCredentials,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is missing"),
            Self::Duplicate(what) => write!(f, "{what} already exists"),
            Self::NotFound(what) => write!(f, "{what} not found"),
            Self::MalformedImport(message) => write!(f, "import rejected: {message}"),
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Monotonic id source seeded from existing records.
///
/// Ids stay epoch-millisecond shaped for compatibility with persisted
/// data, but same-millisecond creations advance past the last issued id
/// instead of colliding.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    last_issued: i64,
}

impl IdGenerator {
    /// Creates a generator that will never issue an id at or below `seed`.
    pub fn seeded(seed: i64) -> Self {
        Self { last_issued: seed }
    }

    /// Issues the next id: current epoch milliseconds, bumped past the
    /// previously issued id when the clock has not advanced.
    pub fn next_id(&mut self) -> i64 {
        let now = Local::now().timestamp_millis();
        self.last_issued = now.max(self.last_issued + 1);
        self.last_issued
    }
}

/// Formats the current local time the way audit log and message dates
/// are displayed.
pub fn format_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, IdGenerator};

    #[test]
    fn ids_are_strictly_increasing_within_one_millisecond() {
        let mut ids = IdGenerator::seeded(0);
        let first = ids.next_id();
        let second = ids.next_id();
        let third = ids.next_id();
        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn seeded_generator_issues_past_the_seed() {
        let far_future = i64::MAX - 10;
        let mut ids = IdGenerator::seeded(far_future);
        assert_eq!(ids.next_id(), far_future + 1);
    }

    #[test]
    fn timestamp_is_fixed_width_format() {
        let stamp = format_timestamp();
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[13..14], ":");
    }
}
