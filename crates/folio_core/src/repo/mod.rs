//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value persistence contract used by all stores.
//! - Isolate SQLite query details from store/business orchestration.
//!
//! # Invariants
//! - A key always holds one complete JSON document; writes replace the
//!   whole value, never patch it.
//! - Repository APIs return semantic errors in addition to DB transport
//!   errors.

pub mod kv_repo;
