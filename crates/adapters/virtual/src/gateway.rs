//! Virtual gateway — the [`Gateway`] implementation itself.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use zonehub_app::ports::{Gateway, GatewayError};
use zonehub_domain::device::{Capability, Device};
use zonehub_domain::event::GatewayEvent;
use zonehub_domain::id::DeviceId;

use crate::handle::VirtualGatewayHandle;
use crate::on_off::VirtualOnOff;

/// A simulated device and its current on/off state.
#[derive(Debug, Clone)]
pub(crate) struct Simulated {
    pub device: Device,
    pub on: bool,
}

/// State shared between the gateway, its handle and its capability objects.
#[derive(Debug)]
pub(crate) struct Shared {
    pub name: String,
    pub devices: Mutex<BTreeMap<DeviceId, Simulated>>,
    pub events: mpsc::UnboundedSender<GatewayEvent>,
    pub closed: AtomicBool,
}

impl Shared {
    pub fn devices(&self) -> MutexGuard<'_, BTreeMap<DeviceId, Simulated>> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue an event for the next read. Events queued after close are lost.
    pub fn queue(&self, event: GatewayEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!(gateway = %self.name, "virtual gateway queue closed, event dropped");
        }
    }
}

/// A simulated on/off device.
pub(crate) fn switch(identifier: DeviceId) -> Device {
    Device::new(identifier, vec![Capability::ON_OFF])
}

/// Simulated coordinator exposing a fixed set of on/off devices.
pub struct VirtualGateway {
    me: Device,
    shared: Arc<Shared>,
    receiver: tokio::sync::Mutex<mpsc::UnboundedReceiver<GatewayEvent>>,
    on_off: VirtualOnOff,
}

impl VirtualGateway {
    /// Create a gateway named `name` with `device_count` simulated switches.
    #[must_use]
    pub fn new(name: impl Into<String>, device_count: usize) -> Self {
        let name = name.into();
        let (events, receiver) = mpsc::unbounded_channel();
        let me = Device::new(
            format!("{name}-coordinator"),
            vec![Capability::DEVICE_DISCOVERY, Capability::ENUMERATE_DEVICE],
        );

        let shared = Arc::new(Shared {
            name,
            devices: Mutex::new(BTreeMap::new()),
            events,
            closed: AtomicBool::new(false),
        });
        {
            let mut devices = shared.devices();
            for n in 1..=device_count {
                let device = switch(DeviceId::new(format!("{}-{n}", shared.name)));
                devices.insert(
                    device.identifier.clone(),
                    Simulated {
                        device: device.clone(),
                        on: false,
                    },
                );
                shared.queue(GatewayEvent::DeviceLoaded { device });
            }
        }

        tracing::debug!(gateway = %shared.name, devices = device_count, "virtual gateway created");

        Self {
            me,
            on_off: VirtualOnOff::new(Arc::clone(&shared)),
            shared,
            receiver: tokio::sync::Mutex::new(receiver),
        }
    }

    /// Name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Handle for injecting activity into this gateway.
    #[must_use]
    pub fn handle(&self) -> VirtualGatewayHandle {
        VirtualGatewayHandle::new(Arc::clone(&self.shared), self.me.clone())
    }

    /// The on/off capability object, also reachable through [`Gateway::capability`].
    #[must_use]
    pub fn on_off(&self) -> &VirtualOnOff {
        &self.on_off
    }
}

#[async_trait]
impl Gateway for VirtualGateway {
    async fn read_event(&self, timeout: Duration) -> Result<GatewayEvent, GatewayError> {
        if self.shared.closed.load(Ordering::Acquire) {
            return Err(GatewayError::Closed);
        }
        let mut receiver = self.receiver.lock().await;
        match tokio::time::timeout(timeout, receiver.recv()).await {
            Ok(Some(event)) => Ok(event),
            Ok(None) => Err(GatewayError::Closed),
            Err(_) => Err(GatewayError::DeadlineExceeded),
        }
    }

    fn self_device(&self) -> Device {
        self.me.clone()
    }

    fn capability(&self, capability: Capability) -> Option<&(dyn Any + Send + Sync)> {
        (capability == Capability::ON_OFF).then_some(&self.on_off as &(dyn Any + Send + Sync))
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![
            Capability::DEVICE_DISCOVERY,
            Capability::ENUMERATE_DEVICE,
            Capability::ON_OFF,
        ]
    }

    fn devices(&self) -> Vec<Device> {
        std::iter::once(self.me.clone())
            .chain(
                self.shared
                    .devices()
                    .values()
                    .map(|simulated| simulated.device.clone()),
            )
            .collect()
    }
}
