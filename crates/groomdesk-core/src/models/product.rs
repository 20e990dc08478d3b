//! Retail product model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{require_non_empty, Entity, EntityId, EntityKind};
use crate::error::{Error, Result};

/// A product sold at the point of sale and tracked in inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Price in cents
    pub price_cents: i64,
    /// Units on hand
    #[serde(default)]
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    #[must_use]
    pub fn new(name: impl Into<String>, price_cents: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            sku: None,
            price_cents,
            stock: 0,
            category: None,
            extra: Map::new(),
        }
    }

    /// Whether the product has run out
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(&self.name, "product name")?;
        if self.price_cents < 0 {
            return Err(Error::InvalidInput(
                "product price must not be negative".to_string(),
            ));
        }
        if self.stock < 0 {
            return Err(Error::InvalidInput(
                "product stock must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_stock() {
        let mut product = Product::new("Detangler", 999);
        assert!(product.is_out_of_stock());
        product.stock = 3;
        assert!(!product.is_out_of_stock());
    }

    #[test]
    fn test_validate_rejects_negative_stock() {
        let mut product = Product::new("Detangler", 999);
        product.stock = -2;
        assert!(product.validate().is_err());
    }
}
