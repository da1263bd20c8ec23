//! Event bus ports — publish/subscribe for domain events.

use std::sync::Arc;

use tokio::sync::mpsc;

use zonehub_domain::event::Event;

/// Publishes events to interested subscribers.
///
/// Publishing never blocks and never fails from the caller's point of view:
/// implementations deliver on a best-effort basis.
pub trait EventPublisher: Send + Sync {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event);
}

impl<T: EventPublisher + ?Sized> EventPublisher for Arc<T> {
    fn publish(&self, event: Event) {
        (**self).publish(event);
    }
}

/// Registers and removes delivery sinks.
pub trait EventSubscriber: Send + Sync {
    /// Start delivering every subsequently published event into `sink`.
    fn subscribe(&self, sink: mpsc::Sender<Event>);

    /// Stop delivering into `sink`. Unknown sinks are ignored.
    fn unsubscribe(&self, sink: &mpsc::Sender<Event>);
}

impl<T: EventSubscriber + ?Sized> EventSubscriber for Arc<T> {
    fn subscribe(&self, sink: mpsc::Sender<Event>) {
        (**self).subscribe(sink);
    }

    fn unsubscribe(&self, sink: &mpsc::Sender<Event>) {
        (**self).unsubscribe(sink);
    }
}
