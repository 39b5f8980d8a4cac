//! Domain models for portfolio content.
//!
//! # Responsibility
//! - Define the canonical records managed by the stores.
//! - Keep serialization shapes identical to the persisted JSON layout.
//!
//! # Invariants
//! - Every project and message is identified by a stable integer id.
//! - Deletion of projects is represented by moving records between
//!   collections, never by mutating the record itself.

pub mod message;
pub mod project;
pub mod skill;
pub mod user;
