//! Core domain logic for Folio, a local-first portfolio content manager.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::message::ContactMessage;
pub use model::project::{LogEntry, Project, ProjectDraft, ProjectId};
pub use model::skill::Skill;
pub use model::user::User;
pub use repo::kv_repo::{keys, KeyValueRepository, RepoError, RepoResult, SqliteKvRepository};
pub use service::account_store::AccountStore;
pub use service::message_store::MessageStore;
pub use service::project_store::{DeleteOutcome, ProjectStore, UndoSlot};
pub use service::skill_store::SkillStore;
pub use service::{StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
