//! Shared application state for axum handlers.

use std::sync::Arc;

use zonehub_app::aggregator::GatewayAggregator;
use zonehub_app::event_bus::EventBus;
use zonehub_app::organiser::DeviceOrganiser;
use zonehub_app::ports::Section;

/// Queue capacity of each SSE client's bus subscription, unless overridden.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 256;

/// Application state shared across all axum handlers.
///
/// Generic over the persistence section to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<S> {
    /// Zone tree and device metadata.
    pub organiser: Arc<DeviceOrganiser<S, Arc<EventBus>>>,
    /// Routing table over every registered gateway.
    pub aggregator: Arc<GatewayAggregator<Arc<EventBus>>>,
    /// Bus that SSE clients subscribe to.
    pub event_bus: Arc<EventBus>,
    /// Queue capacity of each SSE client.
    pub subscriber_capacity: usize,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            organiser: Arc::clone(&self.organiser),
            aggregator: Arc::clone(&self.aggregator),
            event_bus: Arc::clone(&self.event_bus),
            subscriber_capacity: self.subscriber_capacity,
        }
    }
}

impl<S> AppState<S>
where
    S: Section + 'static,
{
    /// Create the state from pre-wrapped `Arc` services.
    ///
    /// The services are shared with background tasks (gateway pollers,
    /// metadata sync) before the HTTP state is constructed.
    pub fn new(
        organiser: Arc<DeviceOrganiser<S, Arc<EventBus>>>,
        aggregator: Arc<GatewayAggregator<Arc<EventBus>>>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            organiser,
            aggregator,
            event_bus,
            subscriber_capacity: DEFAULT_SUBSCRIBER_CAPACITY,
        }
    }

    /// Override the queue capacity of each SSE client.
    #[must_use]
    pub fn with_subscriber_capacity(mut self, capacity: usize) -> Self {
        self.subscriber_capacity = capacity;
        self
    }
}
