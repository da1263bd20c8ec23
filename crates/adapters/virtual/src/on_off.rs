//! On/off capability — switch simulated devices and report the change.

use std::sync::Arc;

use zonehub_domain::device::Capability;
use zonehub_domain::error::NotFoundError;
use zonehub_domain::event::GatewayEvent;
use zonehub_domain::id::DeviceId;

use crate::gateway::Shared;

/// Capability object returned for [`Capability::ON_OFF`].
#[derive(Debug, Clone)]
pub struct VirtualOnOff {
    shared: Arc<Shared>,
}

impl VirtualOnOff {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Switch `device` and queue the resulting `CapabilityUpdated` event.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if the gateway does not simulate `device`.
    pub fn set(&self, device: &DeviceId, on: bool) -> Result<(), NotFoundError> {
        let mut devices = self.shared.devices();
        let simulated = devices
            .get_mut(device)
            .ok_or_else(|| NotFoundError::device(device))?;
        simulated.on = on;

        tracing::debug!(gateway = %self.shared.name, device = %device, on, "virtual switch set");
        self.shared.queue(GatewayEvent::CapabilityUpdated {
            device: simulated.device.clone(),
            capability: Capability::ON_OFF,
            value: serde_json::Value::Bool(on),
        });
        Ok(())
    }

    /// Current state of `device`, if simulated.
    #[must_use]
    pub fn get(&self, device: &DeviceId) -> Option<bool> {
        self.shared.devices().get(device).map(|simulated| simulated.on)
    }
}
