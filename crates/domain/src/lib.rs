//! # zonehub-domain
//!
//! Pure domain model for the zonehub controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers and error sentinels
//! - Define **Zones** (a user-ordered tree of rooms, floors, …)
//! - Define **Device metadata** (user-given name, zone memberships)
//! - Define **Devices** and **Capabilities** as reported by gateways
//! - Define **Events** travelling over the event bus
//! - Define the **section tree** persisted by storage adapters
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod device;
pub mod event;
pub mod metadata;
pub mod section;
pub mod zone;
