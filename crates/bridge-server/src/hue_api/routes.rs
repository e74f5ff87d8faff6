/// Route handlers for the Hue API
use axum::{
    extract::{Path, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::{debug, info};

use hueshim_core::ResolvedConfig;

use super::types::*;
use crate::upnp::generate_description_xml;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ResolvedConfig>,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/description.xml", get(description_xml))
        .route("/api", post(create_username))
        .route("/api/config", get(short_config))
        .route("/api/:username/config", get(user_config))
        .fallback(unknown_route)
        .with_state(state)
}

/// GET /description.xml - UPnP device description document
async fn description_xml(State(state): State<AppState>) -> Response {
    debug!("GET /description.xml");

    let xml = generate_description_xml(state.config.advertise_ip, state.config.advertise_port);
    ([(header::CONTENT_TYPE, "text/xml")], xml).into_response()
}

/// POST /api - create a username for a pairing client
///
/// The bridge hands the same fixed username to everyone; the only
/// validation is that the client identified itself with a devicetype.
async fn create_username(body: String) -> Response {
    let request: CreateUsernameRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!("POST /api with unparseable body: {}", e);
            return devicetype_missing();
        }
    };

    let Some(devicetype) = request.devicetype else {
        return devicetype_missing();
    };

    info!("POST /api: pairing request from devicetype {}", devicetype);
    Json(vec![UsernameResponse::new()]).into_response()
}

fn devicetype_missing() -> Response {
    let message = ApiMessage {
        message: "devicetype not specified".to_string(),
    };
    (StatusCode::BAD_REQUEST, Json(message)).into_response()
}

/// GET /api/config - short bridge config, no username required
async fn short_config(State(state): State<AppState>) -> Response {
    debug!("GET /api/config");

    Json(BridgeConfigView::from_config(&state.config)).into_response()
}

/// GET /api/:username/config - bridge config for a paired client
///
/// The username is not checked; discovery-era clients expect the
/// config view to work with whatever string they hold.
async fn user_config(State(state): State<AppState>, Path(username): Path<String>) -> Response {
    debug!("GET /api/{}/config", username);

    Json(BridgeConfigView::from_config(&state.config)).into_response()
}

/// Everything else under /api is an unauthorized user error; anything
/// outside /api is a plain 404.
async fn unknown_route(uri: Uri) -> Response {
    if let Some(rest) = uri.path().strip_prefix("/api") {
        let address = if rest.is_empty() { "/" } else { rest };
        debug!("Unauthorized request for {}", uri.path());
        return Json(vec![HueError::unauthorized(address)]).into_response();
    }

    StatusCode::NOT_FOUND.into_response()
}
