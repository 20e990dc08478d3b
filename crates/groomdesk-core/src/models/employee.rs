//! Employee model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{require_non_empty, Entity, EntityId, EntityKind};
use crate::error::Result;

const fn default_active() -> bool {
    true
}

/// A member of the grooming staff roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the employee is currently on the roster
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Employee {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            role: None,
            phone: None,
            email: None,
            active: true,
            extra: Map::new(),
        }
    }
}

impl Entity for Employee {
    const KIND: EntityKind = EntityKind::Employee;

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(&self.name, "employee name")
    }
}
