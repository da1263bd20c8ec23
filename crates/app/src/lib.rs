//! # zonehub-app
//!
//! Application layer — the hub core and its **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement:
//!   - `Gateway` — a source of devices and device events
//!   - `Section` — hierarchical key-value persistence
//!   - `EventPublisher` / `EventSubscriber` — event fan-out
//! - Provide the core services:
//!   - `DeviceOrganiser` — zone tree and per-device metadata
//!   - `GatewayAggregator` — routing table over all gateways, one poller each
//!   - `EventBus` — in-process fan-out with per-subscriber bounded queues
//! - Provide glue that needs no IO: metadata sync, initial events, and an
//!   in-memory section store
//!
//! ## Dependency rule
//! Depends on `zonehub-domain` only (plus `tokio` for channels and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod aggregator;
pub mod event_bus;
pub mod initial_events;
pub mod metadata_sync;
pub mod organiser;
pub mod ports;
pub mod section;
