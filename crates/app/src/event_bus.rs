//! In-process fan-out event bus.
//!
//! Every subscriber owns a bounded queue. Publishing attempts a non-blocking
//! enqueue into each of them: when a queue is full the event is dropped for
//! that subscriber only, so a stalled consumer never holds up the publisher
//! or anybody else.

use std::sync::{Arc, PoisonError, RwLock};
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use zonehub_domain::event::Event;

use crate::ports::{EventPublisher, EventSubscriber};

/// In-process event bus with one bounded queue per subscriber.
#[derive(Debug, Default)]
pub struct EventBus {
    sinks: RwLock<Vec<mpsc::Sender<Event>>>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered sinks.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sinks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Subscribe with a fresh queue of `capacity` events.
    ///
    /// The returned [`Subscription`] unsubscribes itself when dropped.
    #[must_use]
    pub fn subscription(self: &Arc<Self>, capacity: usize) -> Subscription {
        let (sender, receiver) = mpsc::channel(capacity);
        self.subscribe(sender.clone());
        Subscription {
            bus: Arc::clone(self),
            sender,
            receiver,
        }
    }
}

impl EventSubscriber for EventBus {
    fn subscribe(&self, sink: mpsc::Sender<Event>) {
        self.sinks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sink);
    }

    fn unsubscribe(&self, sink: &mpsc::Sender<Event>) {
        self.sinks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|existing| !existing.same_channel(sink));
    }
}

impl EventPublisher for EventBus {
    fn publish(&self, event: Event) {
        let sinks = self.sinks.read().unwrap_or_else(PoisonError::into_inner);
        for sink in sinks.iter() {
            match sink.try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::debug!("subscriber queue full, event dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::trace!("subscriber queue closed, event dropped");
                }
            }
        }
    }
}

/// Publisher that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventPublisher;

impl EventPublisher for NullEventPublisher {
    fn publish(&self, _event: Event) {}
}

/// A live registration on an [`EventBus`].
#[derive(Debug)]
pub struct Subscription {
    bus: Arc<EventBus>,
    sender: mpsc::Sender<Event>,
    receiver: mpsc::Receiver<Event>,
}

impl Subscription {
    /// Wait for the next event.
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Poll for the next event, for use inside a `Stream` implementation.
    pub fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.sender);
    }
}
