//! Data models for Groomdesk
//!
//! Every record kind implements [`Entity`], which is all the repositories and
//! the sync queue need to know about it.

mod appointment;
mod client;
mod employee;
mod id;
mod product;
mod service;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

pub use appointment::{Appointment, AppointmentStatus};
pub use client::{Client, Pet};
pub use employee::Employee;
pub use id::EntityId;
pub use product::Product;
pub use service::Service;

/// Category of domain record, each with its own repository and storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Client,
    Appointment,
    Service,
    Product,
    Employee,
}

impl EntityKind {
    pub const ALL: [Self; 5] = [
        Self::Client,
        Self::Appointment,
        Self::Service,
        Self::Product,
        Self::Employee,
    ];

    /// Collection name, used both as the store key and the remote path segment.
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Client => "clients",
            Self::Appointment => "appointments",
            Self::Service => "services",
            Self::Product => "products",
            Self::Employee => "employees",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Appointment => "appointment",
            Self::Service => "service",
            Self::Product => "product",
            Self::Employee => "employee",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized || kind.collection() == normalized)
            .ok_or_else(|| Error::InvalidInput(format!("unknown entity kind '{s}'")))
    }
}

/// A record kind the repositories and the sync queue can manage.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Kind tag of this record type
    const KIND: EntityKind;

    /// Identifier, absent until the record has been stored
    fn id(&self) -> Option<&EntityId>;

    /// Assign the identifier
    fn set_id(&mut self, id: EntityId);

    /// Schema checks applied before a record enters the local store
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Shallow-merge a JSON object `patch` into `record`.
///
/// Top-level fields present in the patch replace the record's fields, absent
/// fields are kept, and the `id` is never changed. The merged value must still
/// deserialize into `T` and pass [`Entity::validate`].
pub fn merge_patch<T: Entity>(record: &T, patch: &Value) -> Result<T> {
    let Value::Object(fields) = patch else {
        return Err(Error::InvalidInput(
            "update patch must be a JSON object".to_string(),
        ));
    };

    let mut merged = serde_json::to_value(record)?;
    let Value::Object(target) = &mut merged else {
        return Err(Error::InvalidInput(format!(
            "{} record does not serialize to an object",
            T::KIND
        )));
    };
    for (key, value) in fields {
        if key == "id" {
            continue;
        }
        target.insert(key.clone(), value.clone());
    }

    let mut updated: T = serde_json::from_value(merged)
        .map_err(|error| Error::InvalidInput(format!("invalid {} patch: {error}", T::KIND)))?;
    if let Some(id) = record.id() {
        updated.set_id(id.clone());
    }
    updated.validate()?;
    Ok(updated)
}

pub(crate) fn require_non_empty(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::InvalidInput(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}
