//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
pub mod gateways;
pub mod sse;
#[allow(clippy::missing_errors_doc)]
pub mod zones;

use axum::Router;
use axum::routing::{get, put};

use zonehub_app::ports::Section;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: Section + 'static,
{
    Router::new()
        // Gateways
        .route("/gateways", get(gateways::list::<S>))
        // Devices
        .route("/devices", get(devices::list::<S>))
        .route(
            "/devices/{id}",
            get(devices::get::<S>).patch(devices::update::<S>),
        )
        // Zones
        .route("/zones", get(zones::list::<S>).post(zones::create::<S>))
        .route(
            "/zones/{id}",
            get(zones::get::<S>)
                .patch(zones::update::<S>)
                .delete(zones::delete::<S>),
        )
        .route(
            "/zones/{id}/devices/{device}",
            put(zones::add_device::<S>).delete(zones::remove_device::<S>),
        )
        // Events
        .route("/events/stream", get(sse::stream::<S>))
}
