//! Initial events — the synthetic event sequence that brings a fresh
//! subscriber up to date before it starts receiving live events.
//!
//! Replaying the sequence in order against an empty model reproduces the
//! current state: zones are emitted depth-first in sibling order, so every
//! parent and every preceding sibling is known before it is referenced.

use std::collections::HashMap;

use zonehub_domain::event::{Event, GatewayEvent, MetadataEvent, ZoneEvent};
use zonehub_domain::id::ZoneId;

use crate::organiser::DeviceOrganiser;
use crate::ports::{EventPublisher, GatewayMapper, Section};

/// Build the snapshot sequence for the current gateways and organiser state.
pub fn initial_events<M, S, P>(mapper: &M, organiser: &DeviceOrganiser<S, P>) -> Vec<Event>
where
    M: GatewayMapper + ?Sized,
    S: Section,
    P: EventPublisher,
{
    let mut events = Vec::new();

    for gateway in mapper.gateways().values() {
        for device in gateway.devices() {
            events.push(GatewayEvent::DeviceLoaded { device }.into());
        }
    }

    let zones = organiser.zones();
    let mut siblings: HashMap<ZoneId, Vec<ZoneId>> = zones
        .iter()
        .map(|zone| (zone.identifier, zone.sub_zones.clone()))
        .collect();
    siblings.insert(
        ZoneId::ROOT,
        organiser
            .root_zones()
            .iter()
            .map(|zone| zone.identifier)
            .collect(),
    );

    for zone in zones {
        let after_zone = siblings.get(&zone.parent_zone).and_then(|children| {
            let idx = children.iter().position(|id| *id == zone.identifier)?;
            idx.checked_sub(1).map(|prev| children[prev])
        });
        events.push(
            ZoneEvent::Created {
                identifier: zone.identifier,
                name: zone.name.clone(),
                after_zone: None,
            }
            .into(),
        );
        events.push(
            ZoneEvent::Updated {
                identifier: zone.identifier,
                name: zone.name,
                parent_zone: zone.parent_zone,
                after_zone,
            }
            .into(),
        );
    }

    for (device, metadata) in organiser.devices() {
        events.push(
            MetadataEvent::Updated {
                device: device.clone(),
                name: metadata.name,
            }
            .into(),
        );
        for zone in metadata.zones {
            events.push(
                MetadataEvent::AddedToZone {
                    device: device.clone(),
                    zone,
                }
                .into(),
            );
        }
    }

    events
}
