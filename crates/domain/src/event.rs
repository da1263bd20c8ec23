//! Event — an immutable record of something that happened.
//!
//! Gateway events originate from device gateways and are republished
//! verbatim by the aggregator. Zone and metadata events are emitted by the
//! organiser whenever a user (or a replayed snapshot) changes the hierarchy.
//! All of them travel over the same bus so subscribers observe one stream.

use serde::{Deserialize, Serialize};

use crate::device::{Capability, Device};
use crate::id::{DeviceId, ZoneId};

/// Everything that travels over the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "event", rename_all = "snake_case")]
pub enum Event {
    Gateway(GatewayEvent),
    Zone(ZoneEvent),
    Metadata(MetadataEvent),
}

/// Raw events read from a gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// A device joined the network.
    DeviceAdded { device: Device },
    /// A device left the network.
    DeviceRemoved { device: Device },
    /// A device was restored from the gateway's own persisted state.
    DeviceLoaded { device: Device },
    /// Capability enumeration of a device finished.
    EnumerationCompleted { device: Device },
    /// A capability reported a new value (e.g. on/off state, a reading).
    CapabilityUpdated {
        device: Device,
        capability: Capability,
        value: serde_json::Value,
    },
}

impl GatewayEvent {
    /// The device this event is about.
    #[must_use]
    pub fn device(&self) -> &Device {
        match self {
            Self::DeviceAdded { device }
            | Self::DeviceRemoved { device }
            | Self::DeviceLoaded { device }
            | Self::EnumerationCompleted { device }
            | Self::CapabilityUpdated { device, .. } => device,
        }
    }
}

/// Structural changes to the zone tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZoneEvent {
    /// A zone was created as the last root child.
    Created {
        identifier: ZoneId,
        name: String,
        /// Previous last root sibling.
        after_zone: Option<ZoneId>,
    },
    /// A zone was renamed, moved or reordered.
    Updated {
        identifier: ZoneId,
        name: String,
        parent_zone: ZoneId,
        after_zone: Option<ZoneId>,
    },
    Destroyed { identifier: ZoneId },
}

/// Changes to per-device metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetadataEvent {
    Updated { device: DeviceId, name: String },
    AddedToZone { device: DeviceId, zone: ZoneId },
    RemovedFromZone { device: DeviceId, zone: ZoneId },
}

impl From<GatewayEvent> for Event {
    fn from(event: GatewayEvent) -> Self {
        Self::Gateway(event)
    }
}

impl From<ZoneEvent> for Event {
    fn from(event: ZoneEvent) -> Self {
        Self::Zone(event)
    }
}

impl From<MetadataEvent> for Event {
    fn from(event: MetadataEvent) -> Self {
        Self::Metadata(event)
    }
}
