//! Grooming service (catalog entry) model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{require_non_empty, Entity, EntityId, EntityKind};
use crate::error::{Error, Result};

/// A bookable grooming service, e.g. "Full groom - large dog"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    /// Price in cents
    pub price_cents: i64,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Service {
    #[must_use]
    pub fn new(name: impl Into<String>, price_cents: i64, duration_minutes: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            price_cents,
            duration_minutes,
            description: None,
            extra: Map::new(),
        }
    }
}

impl Entity for Service {
    const KIND: EntityKind = EntityKind::Service;

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(&self.name, "service name")?;
        if self.price_cents < 0 {
            return Err(Error::InvalidInput(
                "service price must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_negative_price() {
        assert!(Service::new("Nail trim", -1, 15).validate().is_err());
        assert!(Service::new("Nail trim", 1500, 15).validate().is_ok());
    }
}
