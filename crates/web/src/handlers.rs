//! Route handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use mockapi_common::{catalog, routes, Endpoint, HealthResponse, Outcome};
use tracing::{debug, warn};

use crate::server::AppState;

/// Attach the endpoint's `Cache-Control` directive, if it has one
fn with_cache(endpoint: Endpoint, body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
    if let Some(directive) = routes::route(endpoint).cache {
        if let Ok(value) = HeaderValue::from_str(&directive.to_string()) {
            response.headers_mut().insert(header::CACHE_CONTROL, value);
        }
    }
    response
}

pub async fn users_v1_handler() -> Response {
    with_cache(Endpoint::UsersV1, Json(catalog::users_v1()))
}

pub async fn products_handler() -> Response {
    with_cache(Endpoint::Products, Json(catalog::products()))
}

pub async fn users_v2_handler() -> Response {
    with_cache(Endpoint::UsersV2, Json(catalog::users_v2()))
}

/// Answers after the configured delay. A client that disconnects first
/// drops this future and the response is never produced.
pub async fn analytics_handler(State(state): State<Arc<AppState>>) -> Response {
    let delay = state.simulation.analytics_delay();
    debug!(?delay, "delaying analytics response");
    tokio::time::sleep(delay).await;
    with_cache(Endpoint::Analytics, Json(catalog::analytics()))
}

pub async fn orders_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.simulation.draw_outcome() {
        Outcome::Success => with_cache(Endpoint::Orders, Json(catalog::orders())),
        Outcome::Failure => {
            warn!(code = catalog::DB_TIMEOUT_CODE, "simulated orders failure");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(catalog::db_timeout())).into_response()
        }
    }
}

pub async fn removed_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::ok_now())
}
