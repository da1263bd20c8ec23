//! JSON REST handlers for zones and zone membership.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use zonehub_app::ports::Section;
use zonehub_domain::error::NotFoundError;
use zonehub_domain::id::{DeviceId, ZoneId};
use zonehub_domain::zone::Zone;

use crate::api::devices::ensure_metadata;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a zone.
#[derive(Deserialize)]
pub struct CreateZoneRequest {
    pub name: String,
}

/// Request body for updating a zone. Changes apply in field order.
#[derive(Deserialize)]
pub struct UpdateZoneRequest {
    pub name: Option<String>,
    pub parent_zone: Option<ZoneId>,
    pub reorder: Option<Reorder>,
}

/// Placement relative to a sibling.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reorder {
    Before(ZoneId),
    After(ZoneId),
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Zone>>),
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
    Ok(Json<Zone>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Zone>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete and membership endpoints.
pub enum NoContentResponse {
    NoContent,
}

impl IntoResponse for NoContentResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/zones` — top-level zones, in order.
pub async fn list<S>(State(state): State<AppState<S>>) -> ListResponse
where
    S: Section + 'static,
{
    ListResponse::Ok(Json(state.organiser.root_zones()))
}

/// `GET /api/zones/{id}`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<ZoneId>,
) -> Result<GetResponse, ApiError>
where
    S: Section + 'static,
{
    let zone = state
        .organiser
        .zone(id)
        .ok_or_else(|| NotFoundError::zone(id))?;
    Ok(GetResponse::Ok(Json(zone)))
}

/// `POST /api/zones`
pub async fn create<S>(
    State(state): State<AppState<S>>,
    Json(req): Json<CreateZoneRequest>,
) -> CreateResponse
where
    S: Section + 'static,
{
    CreateResponse::Created(Json(state.organiser.new_zone(&req.name)))
}

/// `PATCH /api/zones/{id}`
pub async fn update<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<ZoneId>,
    Json(req): Json<UpdateZoneRequest>,
) -> Result<GetResponse, ApiError>
where
    S: Section + 'static,
{
    let organiser = &state.organiser;
    if let Some(name) = &req.name {
        organiser.name_zone(id, name)?;
    }
    if let Some(parent) = req.parent_zone {
        organiser.move_zone(id, parent)?;
    }
    match req.reorder {
        Some(Reorder::Before(anchor)) => organiser.reorder_zone_before(id, anchor)?,
        Some(Reorder::After(anchor)) => organiser.reorder_zone_after(id, anchor)?,
        None => {}
    }

    let zone = organiser.zone(id).ok_or_else(|| NotFoundError::zone(id))?;
    Ok(GetResponse::Ok(Json(zone)))
}

/// `DELETE /api/zones/{id}`
pub async fn delete<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<ZoneId>,
) -> Result<NoContentResponse, ApiError>
where
    S: Section + 'static,
{
    state.organiser.delete_zone(id)?;
    Ok(NoContentResponse::NoContent)
}

/// `PUT /api/zones/{id}/devices/{device}`
pub async fn add_device<S>(
    State(state): State<AppState<S>>,
    Path((id, device)): Path<(ZoneId, DeviceId)>,
) -> Result<NoContentResponse, ApiError>
where
    S: Section + 'static,
{
    ensure_metadata(&state, &device);
    state.organiser.add_device_to_zone(&device, id)?;
    Ok(NoContentResponse::NoContent)
}

/// `DELETE /api/zones/{id}/devices/{device}`
pub async fn remove_device<S>(
    State(state): State<AppState<S>>,
    Path((id, device)): Path<(ZoneId, DeviceId)>,
) -> Result<NoContentResponse, ApiError>
where
    S: Section + 'static,
{
    state.organiser.remove_device_from_zone(&device, id)?;
    Ok(NoContentResponse::NoContent)
}
