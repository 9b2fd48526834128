use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable numeric identifier for an entity on the map.
///
/// Ids are drawn at random when an entity is built without one. Collisions
/// are astronomically unlikely and tolerated: nothing in the editor keys a
/// map by id, lookups simply return the first match in z order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Wrap a known id (e.g. one read back from a saved scene).
    pub const fn from_raw(raw: u64) -> Self {
        EntityId(raw)
    }

    /// Draw a fresh random id.
    pub fn random() -> Self {
        // Stay within 2^53 so ids survive a trip through JSON numbers in JS hosts.
        EntityId(rand::rng().random_range(1..(1u64 << 53)))
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
