//! Device — something a gateway exposes, together with its capabilities.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::DeviceId;

/// Numeric capability flag advertised by gateways and devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(u16);

impl Capability {
    pub const DEVICE_DISCOVERY: Self = Self(0x0001);
    pub const ENUMERATE_DEVICE: Self = Self(0x0002);
    pub const ON_OFF: Self = Self(0x0004);
    pub const TEMPERATURE_SENSOR: Self = Self(0x0005);
    pub const RELATIVE_HUMIDITY_SENSOR: Self = Self(0x0006);
    pub const POWER_SUPPLY: Self = Self(0x0007);

    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Human readable name, `None` for flags this build does not know.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::DEVICE_DISCOVERY => Some("DeviceDiscovery"),
            Self::ENUMERATE_DEVICE => Some("EnumerateDevice"),
            Self::ON_OFF => Some("OnOff"),
            Self::TEMPERATURE_SENSOR => Some("TemperatureSensor"),
            Self::RELATIVE_HUMIDITY_SENSOR => Some("RelativeHumiditySensor"),
            Self::POWER_SUPPLY => Some("PowerSupply"),
            _ => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "Unknown({:#06x})", self.0),
        }
    }
}

/// A device as reported by its gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub identifier: DeviceId,
    pub capabilities: Vec<Capability>,
}

impl Device {
    #[must_use]
    pub fn new(identifier: impl Into<DeviceId>, capabilities: Vec<Capability>) -> Self {
        Self {
            identifier: identifier.into(),
            capabilities,
        }
    }

    #[must_use]
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}
