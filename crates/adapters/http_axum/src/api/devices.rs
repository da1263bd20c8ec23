//! JSON REST handlers for device metadata.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use zonehub_app::ports::{GatewayMapper, Section};
use zonehub_domain::device::Capability;
use zonehub_domain::error::NotFoundError;
use zonehub_domain::id::{DeviceId, ZoneId};
use zonehub_domain::metadata::DeviceMetadata;

use crate::error::ApiError;
use crate::state::AppState;

/// Device metadata joined with its current routing.
#[derive(Debug, Serialize)]
pub struct DeviceView {
    pub identifier: DeviceId,
    pub name: String,
    pub zones: Vec<ZoneId>,
    /// Name of the gateway currently routing this device, if any.
    pub gateway: Option<String>,
    pub capabilities: Vec<Capability>,
}

/// Request body for updating a device.
#[derive(Deserialize)]
pub struct UpdateDeviceRequest {
    pub name: String,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<DeviceView>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and update endpoints.
pub enum GetResponse {
    Ok(Json<DeviceView>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Create metadata for a device that is routed but not yet known to the
/// organiser, e.g. because its announcement has not been synced yet.
pub(crate) fn ensure_metadata<S>(state: &AppState<S>, id: &DeviceId)
where
    S: Section + 'static,
{
    if state.organiser.device(id).is_none() && state.aggregator.device(id).is_some() {
        state.organiser.add_device(id);
    }
}

fn view<S>(state: &AppState<S>, identifier: DeviceId, metadata: DeviceMetadata) -> DeviceView
where
    S: Section + 'static,
{
    let routed = state.aggregator.device(&identifier);
    let gateway = routed
        .as_ref()
        .and_then(|routed| state.aggregator.gateway_name(&routed.gateway));
    DeviceView {
        identifier,
        name: metadata.name,
        zones: metadata.zones,
        gateway,
        capabilities: routed
            .map(|routed| routed.device.capabilities)
            .unwrap_or_default(),
    }
}

/// `GET /api/devices`
pub async fn list<S>(State(state): State<AppState<S>>) -> ListResponse
where
    S: Section + 'static,
{
    let devices = state
        .organiser
        .devices()
        .into_iter()
        .map(|(id, metadata)| view(&state, id, metadata))
        .collect();
    ListResponse::Ok(Json(devices))
}

/// `GET /api/devices/{id}`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<DeviceId>,
) -> Result<GetResponse, ApiError>
where
    S: Section + 'static,
{
    ensure_metadata(&state, &id);
    let metadata = state
        .organiser
        .device(&id)
        .ok_or_else(|| NotFoundError::device(&id))?;
    Ok(GetResponse::Ok(Json(view(&state, id, metadata))))
}

/// `PATCH /api/devices/{id}`
pub async fn update<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<DeviceId>,
    Json(req): Json<UpdateDeviceRequest>,
) -> Result<GetResponse, ApiError>
where
    S: Section + 'static,
{
    ensure_metadata(&state, &id);
    state.organiser.name_device(&id, &req.name)?;
    let metadata = state
        .organiser
        .device(&id)
        .ok_or_else(|| NotFoundError::device(&id))?;
    Ok(GetResponse::Ok(Json(view(&state, id, metadata))))
}
