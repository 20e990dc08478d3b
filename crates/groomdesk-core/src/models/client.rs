//! Client model

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{require_non_empty, Entity, EntityId, EntityKind};
use crate::error::{Error, Result};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex"));

/// A pet owned by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Pet {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            species: None,
            breed: None,
            extra: Map::new(),
        }
    }
}

/// A client of the grooming business
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pets: Vec<Pet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Fields this build does not model, kept so they survive a round-trip
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Client {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            phone: None,
            email: None,
            pets: Vec::new(),
            notes: None,
            extra: Map::new(),
        }
    }
}

impl Entity for Client {
    const KIND: EntityKind = EntityKind::Client;

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(&self.name, "client name")?;
        if let Some(email) = self.email.as_deref() {
            if !EMAIL_PATTERN.is_match(email.trim()) {
                return Err(Error::InvalidInput(format!(
                    "client email '{email}' is not a valid address"
                )));
            }
        }
        for pet in &self.pets {
            require_non_empty(&pet.name, "pet name")?;
        }
        Ok(())
    }
}
