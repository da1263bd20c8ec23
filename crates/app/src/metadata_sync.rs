//! Metadata sync — creates organiser metadata for devices the moment a
//! gateway reports them.
//!
//! Runs as a background task fed by its own bus [`Subscription`]. Delivery is
//! best effort like any other subscriber: a device whose announcement is
//! dropped gets its metadata on the next `DeviceLoaded`/`EnumerationCompleted`
//! or on first use through the API.

use std::sync::Arc;

use tokio::task::JoinHandle;

use zonehub_domain::event::{Event, GatewayEvent};

use crate::event_bus::Subscription;
use crate::organiser::DeviceOrganiser;
use crate::ports::{EventPublisher, Section};

/// Queue capacity recommended for the sync subscription.
pub const SUBSCRIPTION_CAPACITY: usize = 1024;

/// Spawn the sync task. It runs until aborted.
pub fn spawn<S, P>(
    organiser: Arc<DeviceOrganiser<S, P>>,
    mut subscription: Subscription,
) -> JoinHandle<()>
where
    S: Section + 'static,
    P: EventPublisher + 'static,
{
    tokio::spawn(async move {
        tracing::debug!("metadata sync started");
        while let Some(event) = subscription.recv().await {
            handle(&organiser, &event);
        }
        tracing::debug!("metadata sync stopped");
    })
}

fn handle<S: Section, P: EventPublisher>(organiser: &DeviceOrganiser<S, P>, event: &Event) {
    if let Event::Gateway(
        GatewayEvent::DeviceAdded { device }
        | GatewayEvent::DeviceLoaded { device }
        | GatewayEvent::EnumerationCompleted { device },
    ) = event
    {
        organiser.add_device(&device.identifier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use zonehub_domain::device::{Capability, Device};
    use zonehub_domain::id::DeviceId;

    use crate::event_bus::{EventBus, NullEventPublisher};
    use crate::section::MemorySection;

    fn gateway_event(event: GatewayEvent) -> Event {
        event.into()
    }

    async fn eventually(mut check: impl FnMut() -> bool) -> bool {
        for _ in 0..50 {
            if check() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn should_create_metadata_for_announced_devices() {
        let bus = Arc::new(EventBus::new());
        let organiser = Arc::new(DeviceOrganiser::new(
            &MemorySection::new(),
            NullEventPublisher,
        ));
        let task = spawn(Arc::clone(&organiser), bus.subscription(16));

        let lamp = Device::new("lamp", vec![Capability::ON_OFF]);
        let plug = Device::new("plug", vec![Capability::ON_OFF]);
        bus.publish(gateway_event(GatewayEvent::DeviceAdded { device: lamp }));
        bus.publish(gateway_event(GatewayEvent::EnumerationCompleted { device: plug }));

        assert!(
            eventually(|| organiser.devices().len() == 2).await,
            "metadata should be created"
        );
        task.abort();
    }

    #[tokio::test]
    async fn should_ignore_removals_and_updates() {
        let bus = Arc::new(EventBus::new());
        let organiser = Arc::new(DeviceOrganiser::new(
            &MemorySection::new(),
            NullEventPublisher,
        ));
        let task = spawn(Arc::clone(&organiser), bus.subscription(16));

        let lamp = Device::new("lamp", vec![Capability::ON_OFF]);
        bus.publish(gateway_event(GatewayEvent::DeviceRemoved {
            device: lamp.clone(),
        }));
        bus.publish(gateway_event(GatewayEvent::CapabilityUpdated {
            device: lamp.clone(),
            capability: Capability::ON_OFF,
            value: serde_json::json!(true),
        }));
        bus.publish(gateway_event(GatewayEvent::DeviceLoaded {
            device: Device::new("marker", vec![]),
        }));

        assert!(eventually(|| organiser.device(&DeviceId::new("marker")).is_some()).await);
        assert!(organiser.device(&DeviceId::new("lamp")).is_none());
        task.abort();
    }

    #[tokio::test]
    async fn should_keep_existing_metadata() {
        let bus = Arc::new(EventBus::new());
        let organiser = Arc::new(DeviceOrganiser::new(
            &MemorySection::new(),
            NullEventPublisher,
        ));
        let lamp = DeviceId::new("lamp");
        organiser.add_device(&lamp);
        organiser.name_device(&lamp, "Reading lamp").unwrap();
        let task = spawn(Arc::clone(&organiser), bus.subscription(16));

        bus.publish(gateway_event(GatewayEvent::DeviceLoaded {
            device: Device::new("lamp", vec![Capability::ON_OFF]),
        }));
        bus.publish(gateway_event(GatewayEvent::DeviceLoaded {
            device: Device::new("marker", vec![]),
        }));

        assert!(eventually(|| organiser.device(&DeviceId::new("marker")).is_some()).await);
        assert_eq!(organiser.device(&lamp).unwrap().name, "Reading lamp");
        task.abort();
    }
}
