//! Gateway port — the contract every device gateway (Zigbee coordinator,
//! virtual gateway, …) fulfils, and the read-only routing view the
//! aggregator offers on top of them.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use zonehub_domain::device::{Capability, Device};
use zonehub_domain::event::GatewayEvent;
use zonehub_domain::id::DeviceId;

/// Errors surfaced by [`Gateway::read_event`].
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Nothing arrived before the deadline. Not fatal, callers poll again.
    #[error("deadline exceeded while waiting for gateway event")]
    DeadlineExceeded,

    /// The gateway has shut down and will not produce further events.
    #[error("gateway closed")]
    Closed,

    /// The underlying transport failed.
    #[error("gateway transport failure")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A source of devices and device events.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Wait up to `timeout` for the next event.
    ///
    /// Returns [`GatewayError::DeadlineExceeded`] when nothing arrived in
    /// time. Any other error means the gateway is dead.
    async fn read_event(&self, timeout: Duration) -> Result<GatewayEvent, GatewayError>;

    /// The gateway's own device (the coordinator).
    fn self_device(&self) -> Device;

    /// Capability implementation for `capability`, if supported.
    ///
    /// Callers downcast the returned value to the concrete capability type.
    fn capability(&self, capability: Capability) -> Option<&(dyn Any + Send + Sync)>;

    /// Every capability the gateway implements.
    fn capabilities(&self) -> Vec<Capability>;

    /// Every device the gateway currently knows about.
    fn devices(&self) -> Vec<Device>;
}

/// A device together with the gateway that owns it.
#[derive(Clone)]
pub struct RoutedDevice {
    pub device: Device,
    pub gateway: Arc<dyn Gateway>,
}

impl std::fmt::Debug for RoutedDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutedDevice")
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

/// Read-only view of registered gateways and device routing.
pub trait GatewayMapper: Send + Sync {
    /// Registered gateways by name.
    fn gateways(&self) -> BTreeMap<String, Arc<dyn Gateway>>;

    /// Resolve a device to its owning gateway.
    fn device(&self, id: &DeviceId) -> Option<RoutedDevice>;

    /// Reverse lookup of a gateway's registered name, by identity.
    fn gateway_name(&self, gateway: &Arc<dyn Gateway>) -> Option<String>;
}

impl<T: GatewayMapper + ?Sized> GatewayMapper for Arc<T> {
    fn gateways(&self) -> BTreeMap<String, Arc<dyn Gateway>> {
        (**self).gateways()
    }

    fn device(&self, id: &DeviceId) -> Option<RoutedDevice> {
        (**self).device(id)
    }

    fn gateway_name(&self, gateway: &Arc<dyn Gateway>) -> Option<String> {
        (**self).gateway_name(gateway)
    }
}
