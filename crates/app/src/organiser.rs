//! Zone/device organiser — owns the zone tree and per-device metadata.
//!
//! Two lock domains exist: the zone table and the device table. Operations
//! that need both take the zone lock first. Every mutation is validated
//! before anything changes, then applied, mirrored into the persistence
//! section and announced on the publisher, all under the same lock so an
//! observer can never see a change without its event following.
//!
//! Persisted layout:
//!
//! ```text
//! Zones/NextZoneId
//! Zones/<id>/{Name, ParentZone, OrderAfter}
//! Devices/<id>/Name
//! Devices/<id>/Zones/<zone id> = position
//! ```
//!
//! On construction the persisted state is replayed through the same
//! operations used at runtime, with event emission and section writes
//! switched off. Afterwards only what replay could not reproduce (links to
//! zones that no longer exist) is written back.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use zonehub_domain::error::{NotFoundError, OrganiserError};
use zonehub_domain::event::{Event, MetadataEvent, ZoneEvent};
use zonehub_domain::id::{DeviceId, ZoneId};
use zonehub_domain::metadata::DeviceMetadata;
use zonehub_domain::section::Value;
use zonehub_domain::zone::Zone;

use crate::ports::{EventPublisher, Section};

const ZONES: &str = "Zones";
const DEVICES: &str = "Devices";
const NEXT_ZONE_ID: &str = "NextZoneId";
const NAME: &str = "Name";
const PARENT_ZONE: &str = "ParentZone";
const ORDER_AFTER: &str = "OrderAfter";

#[derive(Debug, Clone, Copy)]
enum Placement {
    Before,
    After,
}

struct ZoneTable {
    zones: HashMap<ZoneId, Zone>,
    next_zone_id: ZoneId,
}

impl ZoneTable {
    fn new() -> Self {
        let mut zones = HashMap::new();
        zones.insert(ZoneId::ROOT, Zone::new(ZoneId::ROOT, ""));
        Self {
            zones,
            next_zone_id: ZoneId::ROOT.next(),
        }
    }

    /// Ordinary zone lookup; the hidden root is never "found".
    fn get(&self, id: ZoneId) -> Result<&Zone, OrganiserError> {
        if id.is_root() {
            return Err(NotFoundError::zone(id).into());
        }
        self.zones
            .get(&id)
            .ok_or_else(|| NotFoundError::zone(id).into())
    }

    /// Lookup that also accepts the hidden root.
    fn node_mut(&mut self, id: ZoneId) -> Result<&mut Zone, OrganiserError> {
        self.zones
            .get_mut(&id)
            .ok_or_else(|| NotFoundError::zone(id).into())
    }

    fn root(&self) -> &Zone {
        &self.zones[&ZoneId::ROOT]
    }

    /// Every zone below `id`, excluding `id` itself.
    fn descendants(&self, id: ZoneId) -> HashSet<ZoneId> {
        let mut found = HashSet::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(zone) = self.zones.get(&current) {
                for child in &zone.sub_zones {
                    if found.insert(*child) {
                        pending.push(*child);
                    }
                }
            }
        }
        found
    }

    /// Depth-first walk below `parent`, in sibling order.
    fn walk(&self, parent: ZoneId, out: &mut Vec<Zone>) {
        if let Some(zone) = self.zones.get(&parent) {
            for child in &zone.sub_zones {
                if let Some(sub) = self.zones.get(child) {
                    out.push(sub.clone());
                    self.walk(*child, out);
                }
            }
        }
    }

    fn updated_event(&self, id: ZoneId) -> Option<ZoneEvent> {
        let zone = self.zones.get(&id)?;
        let parent = self.zones.get(&zone.parent_zone)?;
        Some(ZoneEvent::Updated {
            identifier: id,
            name: zone.name.clone(),
            parent_zone: zone.parent_zone,
            after_zone: parent.predecessor_of(id),
        })
    }
}

/// Authoritative owner of the zone tree and device metadata.
pub struct DeviceOrganiser<S, P> {
    zones: Mutex<ZoneTable>,
    devices: Mutex<HashMap<DeviceId, DeviceMetadata>>,
    zones_section: S,
    devices_section: S,
    publisher: P,
    replaying: AtomicBool,
}

impl<S, P> DeviceOrganiser<S, P>
where
    S: Section,
    P: EventPublisher,
{
    /// Create an organiser over `section`, replaying whatever it already holds.
    ///
    /// Nothing is published or written back while the persisted state is
    /// replayed.
    pub fn new(section: &S, publisher: P) -> Self {
        let organiser = Self {
            zones: Mutex::new(ZoneTable::new()),
            devices: Mutex::new(HashMap::new()),
            zones_section: section.section(ZONES),
            devices_section: section.section(DEVICES),
            publisher,
            replaying: AtomicBool::new(true),
        };
        organiser.load();
        organiser
    }

    // ── zones ──────────────────────────────────────────────────────

    /// Create a zone as the last child of the root.
    #[tracing::instrument(skip(self))]
    pub fn new_zone(&self, name: &str) -> Zone {
        let mut table = self.lock_zones();
        let id = table.next_zone_id;
        table.next_zone_id = id.next();
        self.persist(|| {
            self.zones_section
                .set(NEXT_ZONE_ID, zone_value(table.next_zone_id));
        });

        let (zone, after_zone) = self.insert_zone(&mut table, id, name);
        self.emit(ZoneEvent::Created {
            identifier: id,
            name: zone.name.clone(),
            after_zone,
        });
        tracing::debug!(zone = %id, "zone created");
        zone
    }

    /// Snapshot of a zone.
    pub fn zone(&self, id: ZoneId) -> Option<Zone> {
        self.lock_zones().get(id).ok().cloned()
    }

    /// Snapshots of the top-level zones, in sibling order.
    pub fn root_zones(&self) -> Vec<Zone> {
        let table = self.lock_zones();
        table
            .root()
            .sub_zones
            .iter()
            .filter_map(|id| table.zones.get(id).cloned())
            .collect()
    }

    /// Snapshots of every zone, depth-first in sibling order.
    pub fn zones(&self) -> Vec<Zone> {
        let table = self.lock_zones();
        let mut out = Vec::with_capacity(table.zones.len());
        table.walk(ZoneId::ROOT, &mut out);
        out
    }

    /// Rename a zone.
    ///
    /// # Errors
    ///
    /// Returns [`OrganiserError::NotFound`] when the zone does not exist.
    #[tracing::instrument(skip(self))]
    pub fn name_zone(&self, id: ZoneId, name: &str) -> Result<(), OrganiserError> {
        let mut table = self.lock_zones();
        table.get(id)?;
        table.node_mut(id)?.name = name.to_string();

        self.persist(|| self.zone_section(id).set(NAME, Value::from(name)));
        self.emit_updated(&table, id);
        Ok(())
    }

    /// Move a zone to become the last child of `new_parent`.
    ///
    /// [`ZoneId::ROOT`] is a valid `new_parent`.
    ///
    /// # Errors
    ///
    /// [`OrganiserError::SameZone`] when both are the same zone,
    /// [`OrganiserError::NotFound`] when either does not exist and
    /// [`OrganiserError::CircularReference`] when `new_parent` lies below `id`.
    #[tracing::instrument(skip(self))]
    pub fn move_zone(&self, id: ZoneId, new_parent: ZoneId) -> Result<(), OrganiserError> {
        if id == new_parent {
            return Err(OrganiserError::SameZone);
        }

        let mut table = self.lock_zones();
        let old_parent = table.get(id)?.parent_zone;
        if !new_parent.is_root() {
            table.get(new_parent)?;
        }
        if table.descendants(id).contains(&new_parent) {
            return Err(OrganiserError::CircularReference);
        }

        table.node_mut(old_parent)?.detach(id);
        table.node_mut(new_parent)?.sub_zones.push(id);
        table.node_mut(id)?.parent_zone = new_parent;

        self.persist(|| {
            self.zone_section(id)
                .set(PARENT_ZONE, zone_value(new_parent));
        });
        self.persist_order(&table, old_parent);
        self.persist_order(&table, new_parent);
        self.emit_updated(&table, id);
        Ok(())
    }

    /// Place `id` immediately before its sibling `anchor`.
    ///
    /// # Errors
    ///
    /// [`OrganiserError::SameZone`], [`OrganiserError::NotFound`] or
    /// [`OrganiserError::MustHaveSameParent`].
    pub fn reorder_zone_before(&self, id: ZoneId, anchor: ZoneId) -> Result<(), OrganiserError> {
        self.reorder(id, anchor, Placement::Before)
    }

    /// Place `id` immediately after its sibling `anchor`.
    ///
    /// # Errors
    ///
    /// [`OrganiserError::SameZone`], [`OrganiserError::NotFound`] or
    /// [`OrganiserError::MustHaveSameParent`].
    pub fn reorder_zone_after(&self, id: ZoneId, anchor: ZoneId) -> Result<(), OrganiserError> {
        self.reorder(id, anchor, Placement::After)
    }

    #[tracing::instrument(skip(self))]
    fn reorder(
        &self,
        id: ZoneId,
        anchor: ZoneId,
        placement: Placement,
    ) -> Result<(), OrganiserError> {
        if id == anchor {
            return Err(OrganiserError::SameZone);
        }

        let mut table = self.lock_zones();
        let parent_id = table.get(id)?.parent_zone;
        if table.get(anchor)?.parent_zone != parent_id {
            return Err(OrganiserError::MustHaveSameParent);
        }

        let parent = table.node_mut(parent_id)?;
        parent.detach(id);
        let anchor_idx = parent
            .position_of(anchor)
            .ok_or_else(|| NotFoundError::zone(anchor))?;
        let idx = match placement {
            Placement::Before => anchor_idx,
            Placement::After => anchor_idx + 1,
        };
        parent.sub_zones.insert(idx, id);

        self.persist_order(&table, parent_id);
        self.emit_updated(&table, id);
        Ok(())
    }

    /// Delete an empty zone.
    ///
    /// # Errors
    ///
    /// [`OrganiserError::NotFound`], [`OrganiserError::OrphanZone`] when it
    /// still has sub-zones, [`OrganiserError::HasDevices`] when devices are
    /// still members.
    #[tracing::instrument(skip(self))]
    pub fn delete_zone(&self, id: ZoneId) -> Result<(), OrganiserError> {
        let mut table = self.lock_zones();
        let zone = table.get(id)?;
        if !zone.sub_zones.is_empty() {
            return Err(OrganiserError::OrphanZone);
        }
        if !zone.devices.is_empty() {
            return Err(OrganiserError::HasDevices);
        }
        let parent_id = zone.parent_zone;

        table.node_mut(parent_id)?.detach(id);
        table.zones.remove(&id);

        self.persist(|| {
            self.zones_section.section_delete(&id.to_string());
        });
        self.persist_order(&table, parent_id);
        self.emit(ZoneEvent::Destroyed { identifier: id });
        tracing::debug!(zone = %id, "zone destroyed");
        Ok(())
    }

    // ── devices ────────────────────────────────────────────────────

    /// Start tracking metadata for `id`. Existing metadata is left untouched.
    pub fn add_device(&self, id: &DeviceId) {
        let mut devices = self.lock_devices();
        if devices.contains_key(id) {
            return;
        }
        devices.insert(id.clone(), DeviceMetadata::default());
        self.persist(|| self.device_section(id).set(NAME, Value::from("")));
        tracing::debug!(device = %id, "device metadata created");
    }

    /// Snapshot of a device's metadata.
    pub fn device(&self, id: &DeviceId) -> Option<DeviceMetadata> {
        self.lock_devices().get(id).cloned()
    }

    /// Snapshots of every device's metadata, ordered by device id.
    pub fn devices(&self) -> Vec<(DeviceId, DeviceMetadata)> {
        let mut all: Vec<_> = self
            .lock_devices()
            .iter()
            .map(|(id, metadata)| (id.clone(), metadata.clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Give a device a user-facing name.
    ///
    /// # Errors
    ///
    /// Returns [`OrganiserError::NotFound`] when the device is unknown.
    #[tracing::instrument(skip(self))]
    pub fn name_device(&self, id: &DeviceId, name: &str) -> Result<(), OrganiserError> {
        let mut devices = self.lock_devices();
        let metadata = devices
            .get_mut(id)
            .ok_or_else(|| NotFoundError::device(id))?;
        metadata.name = name.to_string();

        self.persist(|| self.device_section(id).set(NAME, Value::from(name)));
        self.emit(MetadataEvent::Updated {
            device: id.clone(),
            name: name.to_string(),
        });
        Ok(())
    }

    /// Forget a device, detaching it from every zone first.
    #[tracing::instrument(skip(self))]
    pub fn remove_device(&self, id: &DeviceId) {
        let mut table = self.lock_zones();
        let mut devices = self.lock_devices();
        let Some(metadata) = devices.remove(id) else {
            return;
        };

        for zone_id in metadata.zones {
            if let Some(zone) = table.zones.get_mut(&zone_id) {
                zone.devices.remove(id);
            }
            self.emit(MetadataEvent::RemovedFromZone {
                device: id.clone(),
                zone: zone_id,
            });
        }
        self.persist(|| {
            self.devices_section.section_delete(id.as_str());
        });
    }

    /// Make `device` a member of `zone`. Adding an existing member is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`OrganiserError::NotFound`] when either side is unknown.
    #[tracing::instrument(skip(self))]
    pub fn add_device_to_zone(&self, device: &DeviceId, zone: ZoneId) -> Result<(), OrganiserError> {
        let mut table = self.lock_zones();
        let mut devices = self.lock_devices();
        table.get(zone)?;
        let metadata = devices
            .get_mut(device)
            .ok_or_else(|| NotFoundError::device(device))?;
        if metadata.in_zone(zone) {
            return Ok(());
        }

        metadata.zones.push(zone);
        table.node_mut(zone)?.devices.insert(device.clone());

        self.persist_memberships(device, &metadata.zones);
        self.emit(MetadataEvent::AddedToZone {
            device: device.clone(),
            zone,
        });
        Ok(())
    }

    /// Remove `device` from `zone`. Removing a non-member is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`OrganiserError::NotFound`] when either side is unknown.
    #[tracing::instrument(skip(self))]
    pub fn remove_device_from_zone(
        &self,
        device: &DeviceId,
        zone: ZoneId,
    ) -> Result<(), OrganiserError> {
        let mut table = self.lock_zones();
        let mut devices = self.lock_devices();
        table.get(zone)?;
        let metadata = devices
            .get_mut(device)
            .ok_or_else(|| NotFoundError::device(device))?;
        if !metadata.in_zone(zone) {
            return Ok(());
        }

        metadata.zones.retain(|z| *z != zone);
        table.node_mut(zone)?.devices.remove(device);

        self.persist_memberships(device, &metadata.zones);
        self.emit(MetadataEvent::RemovedFromZone {
            device: device.clone(),
            zone,
        });
        Ok(())
    }

    // ── internals ──────────────────────────────────────────────────

    /// Insert a fresh zone as the last root child. Returns it and the
    /// previous last root child.
    fn insert_zone(&self, table: &mut ZoneTable, id: ZoneId, name: &str) -> (Zone, Option<ZoneId>) {
        let zone = Zone::new(id, name);
        table.zones.insert(id, zone.clone());
        let root = table
            .zones
            .entry(ZoneId::ROOT)
            .or_insert_with(|| Zone::new(ZoneId::ROOT, ""));
        let after_zone = root.sub_zones.last().copied();
        root.sub_zones.push(id);

        self.persist(|| {
            let section = self.zone_section(id);
            section.set(NAME, Value::from(name));
            section.set(PARENT_ZONE, zone_value(ZoneId::ROOT));
        });
        self.persist_order(table, ZoneId::ROOT);
        (zone, after_zone)
    }

    /// Record each child's predecessor so sibling order survives a reload.
    /// Only links that differ from what is stored are written.
    fn persist_order(&self, table: &ZoneTable, parent: ZoneId) {
        if self.is_replaying() {
            return;
        }
        let Some(parent) = table.zones.get(&parent) else {
            return;
        };
        let mut previous = ZoneId::ROOT;
        for child in &parent.sub_zones {
            let section = self.zone_section(*child);
            let stored = section.int(ORDER_AFTER).and_then(zone_from_value);
            if stored != Some(previous) {
                section.set(ORDER_AFTER, zone_value(previous));
            }
            previous = *child;
        }
    }

    fn persist_memberships(&self, device: &DeviceId, zones: &[ZoneId]) {
        if self.is_replaying() {
            return;
        }
        let section = self.device_section(device);
        section.section_delete(ZONES);
        let memberships = section.section(ZONES);
        for (position, zone) in (0_i64..).zip(zones) {
            memberships.set(&zone.to_string(), Value::from(position));
        }
    }

    fn zone_section(&self, id: ZoneId) -> S {
        self.zones_section.section(&id.to_string())
    }

    fn device_section(&self, id: &DeviceId) -> S {
        self.devices_section.section(id.as_str())
    }

    fn emit_updated(&self, table: &ZoneTable, id: ZoneId) {
        if let Some(event) = table.updated_event(id) {
            self.emit(event);
        }
    }

    fn emit(&self, event: impl Into<Event>) {
        if !self.is_replaying() {
            self.publisher.publish(event.into());
        }
    }

    fn persist(&self, write: impl FnOnce()) {
        if !self.is_replaying() {
            write();
        }
    }

    fn is_replaying(&self) -> bool {
        self.replaying.load(Ordering::Acquire)
    }

    fn lock_zones(&self) -> MutexGuard<'_, ZoneTable> {
        self.zones.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_devices(&self) -> MutexGuard<'_, HashMap<DeviceId, DeviceMetadata>> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── replay ─────────────────────────────────────────────────────

    /// Rebuild state from the section. Everything is read up front, then
    /// replayed without touching the section.
    fn load(&self) {
        let zones = self.stored_zones();
        let devices = self.stored_devices();

        {
            let mut table = self.lock_zones();
            for zone in &zones {
                self.insert_zone(&mut table, zone.id, &zone.name);
            }
            let past_highest = zones.last().map_or(ZoneId::ROOT.next(), |zone| zone.id.next());
            table.next_zone_id = self
                .zones_section
                .int(NEXT_ZONE_ID)
                .and_then(zone_from_value)
                .map_or(past_highest, |persisted| persisted.max(past_highest));
        }

        for zone in zones.iter().filter(|zone| !zone.parent.is_root()) {
            if let Err(err) = self.move_zone(zone.id, zone.parent) {
                tracing::warn!(zone = %zone.id, parent = %zone.parent, error = %err, "could not restore zone parent");
            }
        }

        let after: HashMap<ZoneId, ZoneId> = zones.iter().map(|zone| (zone.id, zone.after)).collect();
        for parent in std::iter::once(ZoneId::ROOT).chain(zones.iter().map(|zone| zone.id)) {
            self.restore_order(parent, &after);
        }

        for device in &devices {
            self.add_device(&device.id);
            if let Some(name) = &device.name
                && let Err(err) = self.name_device(&device.id, name)
            {
                tracing::warn!(device = %device.id, error = %err, "could not restore device name");
            }
            for zone in &device.zones {
                if let Err(err) = self.add_device_to_zone(&device.id, *zone) {
                    tracing::warn!(device = %device.id, zone = %zone, error = %err, "could not restore zone membership");
                }
            }
        }

        self.replaying.store(false, Ordering::Release);
        self.reconcile(&zones, &devices);
        tracing::info!(zones = zones.len(), devices = devices.len(), "organiser state loaded");
    }

    /// Write back the parts of the replayed state that differ from the
    /// section. A consistent section is left untouched.
    fn reconcile(&self, zones: &[StoredZone], devices: &[StoredDevice]) {
        {
            let table = self.lock_zones();
            let stored_next = self.zones_section.int(NEXT_ZONE_ID).and_then(zone_from_value);
            if !zones.is_empty() && stored_next != Some(table.next_zone_id) {
                self.zones_section
                    .set(NEXT_ZONE_ID, zone_value(table.next_zone_id));
            }
            for zone in zones {
                let Some(current) = table.zones.get(&zone.id) else {
                    continue;
                };
                if current.parent_zone != zone.parent {
                    tracing::warn!(zone = %zone.id, "repairing persisted zone parent");
                    self.zone_section(zone.id)
                        .set(PARENT_ZONE, zone_value(current.parent_zone));
                }
            }
            for parent in std::iter::once(ZoneId::ROOT).chain(zones.iter().map(|zone| zone.id)) {
                self.persist_order(&table, parent);
            }
        }

        let current = self.lock_devices();
        for device in devices {
            if let Some(metadata) = current.get(&device.id)
                && metadata.zones != device.zones
            {
                tracing::warn!(device = %device.id, "repairing persisted zone memberships");
                self.persist_memberships(&device.id, &metadata.zones);
            }
        }
    }

    /// Persisted zones, in identifier order.
    fn stored_zones(&self) -> Vec<StoredZone> {
        let mut zones: Vec<StoredZone> = self
            .zones_section
            .section_keys()
            .iter()
            .filter_map(|key| match key.parse::<ZoneId>() {
                Ok(id) if !id.is_root() => Some(id),
                _ => {
                    tracing::warn!(key = %key, "ignoring persisted zone with invalid identifier");
                    None
                }
            })
            .map(|id| {
                let section = self.zone_section(id);
                let link = |key: &str| section.int(key).and_then(zone_from_value).unwrap_or(ZoneId::ROOT);
                StoredZone {
                    id,
                    name: section.string(NAME).unwrap_or_default(),
                    parent: link(PARENT_ZONE),
                    after: link(ORDER_AFTER),
                }
            })
            .collect();
        zones.sort_unstable_by_key(|zone| zone.id);
        zones
    }

    /// Persisted devices, memberships ordered by their stored position.
    fn stored_devices(&self) -> Vec<StoredDevice> {
        self.devices_section
            .section_keys()
            .into_iter()
            .map(|key| {
                let id = DeviceId::new(key);
                let section = self.device_section(&id);
                let memberships = section.section(ZONES);
                let mut zones: Vec<(i64, ZoneId)> = memberships
                    .keys()
                    .iter()
                    .filter_map(|key| {
                        let zone = key.parse::<ZoneId>().ok()?;
                        Some((memberships.int(key).unwrap_or(i64::MAX), zone))
                    })
                    .collect();
                zones.sort_unstable();
                StoredDevice {
                    name: section.string(NAME),
                    zones: zones.into_iter().map(|(_, zone)| zone).collect(),
                    id,
                }
            })
            .collect()
    }

    /// Put the children of `parent` back into their persisted order.
    fn restore_order(&self, parent: ZoneId, after: &HashMap<ZoneId, ZoneId>) {
        let children = match self.lock_zones().zones.get(&parent) {
            Some(zone) if zone.sub_zones.len() > 1 => zone.sub_zones.clone(),
            _ => return,
        };

        let desired = persisted_order(&children, after);
        if desired[0] != children[0] {
            self.restore_position(desired[0], children[0], Placement::Before);
        }
        for pair in desired.windows(2) {
            self.restore_position(pair[1], pair[0], Placement::After);
        }
    }

    fn restore_position(&self, id: ZoneId, anchor: ZoneId, placement: Placement) {
        if let Err(err) = self.reorder(id, anchor, placement) {
            tracing::warn!(zone = %id, anchor = %anchor, error = %err, "could not restore zone order");
        }
    }
}

struct StoredZone {
    id: ZoneId,
    name: String,
    parent: ZoneId,
    after: ZoneId,
}

struct StoredDevice {
    id: DeviceId,
    name: Option<String>,
    zones: Vec<ZoneId>,
}

/// Follow the "ordered after" links among `children`. Children the chain
/// does not reach keep their current relative order at the end.
fn persisted_order(children: &[ZoneId], after: &HashMap<ZoneId, ZoneId>) -> Vec<ZoneId> {
    let predecessor = |id: ZoneId| after.get(&id).copied().unwrap_or(ZoneId::ROOT);

    let mut ordered = Vec::with_capacity(children.len());
    let mut visited = HashSet::new();
    let mut current = children
        .iter()
        .copied()
        .find(|id| !children.contains(&predecessor(*id)));
    while let Some(id) = current {
        if !visited.insert(id) {
            break;
        }
        ordered.push(id);
        current = children
            .iter()
            .copied()
            .find(|candidate| predecessor(*candidate) == id && !visited.contains(candidate));
    }
    ordered.extend(children.iter().filter(|id| !visited.contains(*id)));
    ordered
}

fn zone_value(id: ZoneId) -> Value {
    Value::Int(i64::try_from(id.get()).unwrap_or(i64::MAX))
}

fn zone_from_value(value: i64) -> Option<ZoneId> {
    u64::try_from(value).ok().map(ZoneId::new)
}
