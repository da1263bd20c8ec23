//! JSON REST handlers for gateways.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use zonehub_app::ports::{GatewayMapper, Section};
use zonehub_domain::device::{Capability, Device};

use crate::state::AppState;

/// A registered gateway as seen by API clients.
#[derive(Debug, Serialize)]
pub struct GatewayView {
    pub name: String,
    pub device: Device,
    pub capabilities: Vec<Capability>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<GatewayView>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/gateways`
pub async fn list<S>(State(state): State<AppState<S>>) -> ListResponse
where
    S: Section + 'static,
{
    let gateways = state
        .aggregator
        .gateways()
        .into_iter()
        .map(|(name, gateway)| GatewayView {
            name,
            device: gateway.self_device(),
            capabilities: gateway.capabilities(),
        })
        .collect();
    ListResponse::Ok(Json(gateways))
}
