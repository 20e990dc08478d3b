//! Appointment model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Entity, EntityId, EntityKind};
use crate::error::{Error, Result};

/// Appointment lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

/// A booked grooming appointment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub client_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EntityId>,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Appointment {
    #[must_use]
    pub fn new(client_id: EntityId, starts_at: DateTime<Utc>, duration_minutes: u32) -> Self {
        Self {
            id: None,
            client_id,
            pet_name: None,
            service_id: None,
            employee_id: None,
            starts_at,
            duration_minutes,
            status: AppointmentStatus::Scheduled,
            notes: None,
            extra: Map::new(),
        }
    }

    /// End of the booked slot
    #[must_use]
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + Duration::minutes(i64::from(self.duration_minutes))
    }
}

impl Entity for Appointment {
    const KIND: EntityKind = EntityKind::Appointment;

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<()> {
        if self.duration_minutes == 0 {
            return Err(Error::InvalidInput(
                "appointment duration must be at least one minute".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ends_at() {
        let start = Utc.with_ymd_and_hms(2026, 5, 2, 9, 30, 0).unwrap();
        let appointment = Appointment::new(EntityId::from(3), start, 90);
        assert_eq!(
            appointment.ends_at(),
            Utc.with_ymd_and_hms(2026, 5, 2, 11, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::NoShow).unwrap(),
            "\"no_show\""
        );
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let start = Utc.with_ymd_and_hms(2026, 5, 2, 9, 30, 0).unwrap();
        assert!(Appointment::new(EntityId::from(3), start, 0)
            .validate()
            .is_err());
    }
}
