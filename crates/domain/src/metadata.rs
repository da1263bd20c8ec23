//! User-facing metadata attached to a device.

use serde::{Deserialize, Serialize};

use crate::id::ZoneId;

/// Name and zone memberships of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMetadata {
    pub name: String,
    /// Zones the device belongs to, in the order it was added to them.
    pub zones: Vec<ZoneId>,
}

impl DeviceMetadata {
    #[must_use]
    pub fn in_zone(&self, zone: ZoneId) -> bool {
        self.zones.contains(&zone)
    }
}
