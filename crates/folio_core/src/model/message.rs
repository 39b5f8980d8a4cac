//! Contact message domain model.

use crate::model::project::ProjectId;
use serde::{Deserialize, Serialize};

/// Identifier alias shared with projects: epoch-millisecond based,
/// strictly monotonic per store.
pub type MessageId = ProjectId;

/// One submitted contact-form message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub id: MessageId,
    pub name: String,
    pub email: String,
    pub message: String,
    /// Human-formatted local timestamp of submission.
    pub date: String,
}
