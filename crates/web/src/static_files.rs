//! Static file serving for the demo page

use std::path::Path;

use axum::{
    http::{header, HeaderValue},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

pub const NO_CACHE_DIRECTIVE: &str = "no-store, no-cache, must-revalidate";

/// Serve `dir` from disk. Missing files answer 404.
///
/// With `no_cache`, every static response is marked uncacheable so browser
/// demos always reload fresh assets.
pub fn static_router(dir: &Path, no_cache: bool) -> Router {
    let router = Router::new().fallback_service(ServeDir::new(dir));
    if !no_cache {
        return router;
    }

    router
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(NO_CACHE_DIRECTIVE),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
}
