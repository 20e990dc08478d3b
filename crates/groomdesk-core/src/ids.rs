//! Client-side id assignment for records created while offline.

use std::sync::atomic::{AtomicI64, Ordering};

use uuid::Uuid;

use crate::models::EntityId;

/// Source of fresh entity ids. Implementations must never hand out the same
/// id twice within a process.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> EntityId;
}

/// UUID v7 ids (time-sortable, collision-free under rapid successive calls)
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self) -> EntityId {
        EntityId::Text(Uuid::now_v7().to_string())
    }
}

/// Monotonic integer ids, handy for tests and readable fixtures
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicI64,
}

impl SequentialIdGenerator {
    pub const fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> EntityId {
        EntityId::Number(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
