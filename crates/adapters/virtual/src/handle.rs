//! Handle for driving a [`VirtualGateway`](crate::VirtualGateway) from the
//! outside.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use zonehub_domain::device::Device;
use zonehub_domain::event::GatewayEvent;
use zonehub_domain::id::DeviceId;

use crate::gateway::{Shared, Simulated, switch};

/// Injects device activity into a virtual gateway.
#[derive(Debug, Clone)]
pub struct VirtualGatewayHandle {
    shared: Arc<Shared>,
    coordinator: Device,
}

impl VirtualGatewayHandle {
    pub(crate) fn new(shared: Arc<Shared>, coordinator: Device) -> Self {
        Self {
            shared,
            coordinator,
        }
    }

    /// Simulate a newly paired switch. Returns `None` if `id` is taken.
    pub fn add_device(&self, id: impl Into<DeviceId>) -> Option<Device> {
        let id = id.into();
        let mut devices = self.shared.devices();
        if devices.contains_key(&id) || id == self.coordinator.identifier {
            return None;
        }
        let device = switch(id.clone());
        devices.insert(
            id,
            Simulated {
                device: device.clone(),
                on: false,
            },
        );
        self.shared.queue(GatewayEvent::DeviceAdded {
            device: device.clone(),
        });
        Some(device)
    }

    /// Simulate a switch leaving the network. Returns `false` if unknown.
    pub fn remove_device(&self, id: &DeviceId) -> bool {
        let Some(simulated) = self.shared.devices().remove(id) else {
            return false;
        };
        self.shared.queue(GatewayEvent::DeviceRemoved {
            device: simulated.device,
        });
        true
    }

    /// Re-enumerate: report `EnumerationCompleted` for every simulated switch.
    pub fn enumerate(&self) {
        for simulated in self.shared.devices().values() {
            self.shared.queue(GatewayEvent::EnumerationCompleted {
                device: simulated.device.clone(),
            });
        }
    }

    /// Close the gateway. Every later read fails with `Closed`.
    pub fn close(&self) {
        self.shared.closed.store(true, Ordering::Release);
        tracing::info!(gateway = %self.shared.name, "virtual gateway closed");
    }
}
