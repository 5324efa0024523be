//! Runtime errors.
//!
//! Expected decision-level conditions (missing targets, out-of-range
//! entities) never surface here; they are handled locally as tree `Failure`
//! or silent no-ops. `RuntimeError` covers the structural problems the
//! embedding application must see: registry misuse, unknown tree leaves,
//! and persistence failures.

use agent_core::{AgentId, GroupId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// An agent with this id is already registered.
    #[error("agent {0} is already registered")]
    AlreadyRegistered(AgentId),

    /// No agent with this id is registered.
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    /// No group with this id exists.
    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    /// The group is at its configured maximum size.
    #[error("group {0} is full")]
    GroupFull(GroupId),

    /// A tree descriptor referenced a leaf name with no registered builder.
    #[error("unknown behavior leaf `{0}`")]
    UnknownLeaf(String),

    /// Configuration file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// Persistence I/O failed.
    #[error("persistence I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization failed.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
