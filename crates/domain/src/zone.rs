//! Zone — a user-defined grouping (room, floor, outbuilding) in a tree.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::id::{DeviceId, ZoneId};

/// A node of the zone tree.
///
/// Values handed out by the organiser are snapshots; editing one has no
/// effect on the organiser's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub identifier: ZoneId,
    pub name: String,
    /// Parent zone, [`ZoneId::ROOT`] for top-level zones.
    pub parent_zone: ZoneId,
    /// Children, in user-controlled order.
    pub sub_zones: Vec<ZoneId>,
    pub devices: BTreeSet<DeviceId>,
}

impl Zone {
    /// Create a childless, empty zone hanging from the root.
    #[must_use]
    pub fn new(identifier: ZoneId, name: impl Into<String>) -> Self {
        Self {
            identifier,
            name: name.into(),
            parent_zone: ZoneId::ROOT,
            sub_zones: Vec::new(),
            devices: BTreeSet::new(),
        }
    }

    /// Position of `child` among this zone's sub-zones.
    #[must_use]
    pub fn position_of(&self, child: ZoneId) -> Option<usize> {
        self.sub_zones.iter().position(|id| *id == child)
    }

    /// The sibling ordered immediately before `child`, if any.
    #[must_use]
    pub fn predecessor_of(&self, child: ZoneId) -> Option<ZoneId> {
        match self.position_of(child) {
            Some(idx) if idx > 0 => Some(self.sub_zones[idx - 1]),
            _ => None,
        }
    }

    /// Remove `child` from the sub-zones, keeping the order of the others.
    pub fn detach(&mut self, child: ZoneId) {
        self.sub_zones.retain(|id| *id != child);
    }
}
