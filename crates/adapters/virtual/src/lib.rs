//! # zonehub-adapter-virtual
//!
//! Virtual/demo gateway that simulates a coordinator and a set of on/off
//! devices, for testing and demonstration purposes.
//!
//! ## Provided devices
//!
//! | Device | Identifier | Capabilities |
//! |--------|------------|--------------|
//! | Coordinator | `<name>-coordinator` | device discovery, enumerate device |
//! | Switch *n* | `<name>-<n>` | on/off |
//!
//! Simulated devices are announced with `DeviceLoaded` as soon as the gateway
//! is constructed. A [`VirtualGatewayHandle`] injects further activity: new
//! or removed devices, re-enumeration, or closing the gateway altogether.
//!
//! ## Dependency rule
//!
//! Depends on `zonehub-app` (port traits) and `zonehub-domain` only.

mod gateway;
mod handle;
mod on_off;

pub use gateway::VirtualGateway;
pub use handle::VirtualGatewayHandle;
pub use on_off::VirtualOnOff;
