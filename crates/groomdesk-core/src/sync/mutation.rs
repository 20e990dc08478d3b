//! Pending mutation model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{EntityId, EntityKind};

/// Kind of write waiting to be replayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationAction {
    Create,
    Update,
    Delete,
}

impl MutationAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A local write not yet confirmed by the remote side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingMutation {
    /// Target entity
    pub id: EntityId,
    /// Collection the entity belongs to
    pub kind: EntityKind,
    pub action: MutationAction,
    /// Full record for create/update, `{"id": ..}` for delete
    pub data: Value,
    /// When the mutation was enqueued
    pub last_modified: DateTime<Utc>,
    /// Set once the remote replay succeeded
    pub synced: bool,
    /// Position stamp, reassigned on load and never persisted
    #[serde(skip)]
    pub(crate) seq: u64,
}

impl PendingMutation {
    /// Whether this mutation targets the given entity
    pub fn targets(&self, kind: EntityKind, id: &EntityId) -> bool {
        self.kind == kind && &self.id == id
    }
}
