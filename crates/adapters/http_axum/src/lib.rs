//! # zonehub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **REST-ish JSON API** over the organiser and the aggregator
//!   (`/api/zones`, `/api/devices`, `/api/gateways`)
//! - Stream events to clients as **server-sent events**
//!   (`/api/events/stream`): a snapshot of the current state first, then
//!   live events
//! - Map HTTP requests into organiser calls (driving adapter)
//! - Map organiser errors into HTTP status codes
//!
//! ## Dependency rule
//! Depends on `zonehub-app` (for ports and services) and `zonehub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
