//! Gateway aggregator — bridges any number of gateways into one routing
//! table and one outgoing event stream.
//!
//! Each registered gateway gets a dedicated polling task. Gateways only offer
//! a blocking "read next event" with a deadline, so the task reads with a
//! short timeout and checks the shutdown flag between reads; shutdown latency
//! is bounded by [`POLL_TIMEOUT`]. Events from one gateway are republished in
//! the order the gateway produced them.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use zonehub_domain::event::GatewayEvent;
use zonehub_domain::id::DeviceId;

use crate::ports::{EventPublisher, Gateway, GatewayError, GatewayMapper, RoutedDevice};

/// Upper bound on a single gateway read.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Errors raised when registering gateways.
#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("a gateway named {0} is already registered")]
    GatewayAlreadyRegistered(String),
}

#[derive(Default)]
struct RoutingTable {
    gateways: BTreeMap<String, Arc<dyn Gateway>>,
    devices: HashMap<DeviceId, RoutedDevice>,
}

impl RoutingTable {
    fn route(&mut self, gateway: &Arc<dyn Gateway>, event: &GatewayEvent) {
        match event {
            GatewayEvent::DeviceAdded { device }
            | GatewayEvent::DeviceLoaded { device }
            | GatewayEvent::EnumerationCompleted { device } => {
                self.devices.insert(
                    device.identifier.clone(),
                    RoutedDevice {
                        device: device.clone(),
                        gateway: Arc::clone(gateway),
                    },
                );
            }
            GatewayEvent::DeviceRemoved { device } => {
                self.devices.remove(&device.identifier);
            }
            GatewayEvent::CapabilityUpdated { .. } => {}
        }
    }

    /// Drop a dead gateway and every route pointing at it, unless the name
    /// has meanwhile been taken by a replacement.
    fn forget(&mut self, name: &str, gateway: &Arc<dyn Gateway>) {
        let registered = self
            .gateways
            .get(name)
            .is_some_and(|current| same_gateway(current, gateway));
        if registered {
            self.gateways.remove(name);
        }
        self.devices
            .retain(|_, routed| !same_gateway(&routed.gateway, gateway));
    }
}

fn same_gateway(a: &Arc<dyn Gateway>, b: &Arc<dyn Gateway>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Aggregates gateways behind one routing table and republishes their events.
pub struct GatewayAggregator<P> {
    routing: Arc<RwLock<RoutingTable>>,
    publisher: P,
    shutdown: watch::Sender<bool>,
    pollers: Mutex<Vec<JoinHandle<()>>>,
}

impl<P> GatewayAggregator<P>
where
    P: EventPublisher + Clone + 'static,
{
    /// Create an aggregator that republishes gateway events into `publisher`.
    pub fn new(publisher: P) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            routing: Arc::new(RwLock::new(RoutingTable::default())),
            publisher,
            shutdown,
            pollers: Mutex::new(Vec::new()),
        }
    }

    /// Register `gateway` under `name` and start polling it.
    ///
    /// The gateway's own device is routed immediately. Must be called from
    /// within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::GatewayAlreadyRegistered`] when `name` is
    /// taken.
    pub fn add(
        &self,
        name: impl Into<String>,
        gateway: Arc<dyn Gateway>,
    ) -> Result<(), AggregatorError> {
        let name = name.into();
        {
            let mut routing = self.write();
            if routing.gateways.contains_key(&name) {
                return Err(AggregatorError::GatewayAlreadyRegistered(name));
            }
            routing.gateways.insert(name.clone(), Arc::clone(&gateway));
            let device = gateway.self_device();
            routing.devices.insert(
                device.identifier.clone(),
                RoutedDevice {
                    device,
                    gateway: Arc::clone(&gateway),
                },
            );
        }

        tracing::info!(gateway = %name, "gateway registered");

        let handle = tokio::spawn(poll_gateway(
            name,
            gateway,
            Arc::clone(&self.routing),
            self.publisher.clone(),
            self.shutdown.subscribe(),
        ));
        self.pollers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
        Ok(())
    }

    /// Signal every polling task to exit. Does not wait for them.
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    /// Wait until every polling task started so far has exited.
    pub async fn wait(&self) {
        let pollers: Vec<_> = self
            .pollers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for poller in pollers {
            if let Err(err) = poller.await {
                tracing::warn!(error = %err, "gateway poller ended abnormally");
            }
        }
    }
}

impl<P> GatewayAggregator<P> {
    fn read(&self) -> RwLockReadGuard<'_, RoutingTable> {
        self.routing.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RoutingTable> {
        self.routing.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: Send + Sync> GatewayMapper for GatewayAggregator<P> {
    fn gateways(&self) -> BTreeMap<String, Arc<dyn Gateway>> {
        self.read().gateways.clone()
    }

    fn device(&self, id: &DeviceId) -> Option<RoutedDevice> {
        self.read().devices.get(id).cloned()
    }

    fn gateway_name(&self, gateway: &Arc<dyn Gateway>) -> Option<String> {
        self.read()
            .gateways
            .iter()
            .find(|(_, candidate)| same_gateway(candidate, gateway))
            .map(|(name, _)| name.clone())
    }
}

async fn poll_gateway<P: EventPublisher>(
    name: String,
    gateway: Arc<dyn Gateway>,
    routing: Arc<RwLock<RoutingTable>>,
    publisher: P,
    shutdown: watch::Receiver<bool>,
) {
    tracing::debug!(gateway = %name, "gateway poller started");

    while !*shutdown.borrow() {
        match gateway.read_event(POLL_TIMEOUT).await {
            Ok(event) => {
                routing
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .route(&gateway, &event);
                publisher.publish(event.into());
            }
            Err(GatewayError::DeadlineExceeded) => {}
            Err(err) => {
                tracing::error!(gateway = %name, error = %err, "gateway read failed, poller exiting");
                routing
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .forget(&name, &gateway);
                return;
            }
        }
    }

    tracing::debug!(gateway = %name, "gateway poller stopped");
}
