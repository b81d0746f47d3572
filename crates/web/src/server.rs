//! Web server implementation

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, MethodRouter},
    Router,
};
use mockapi_common::{routes, Endpoint, Simulation, ROUTES};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::handlers::{
    analytics_handler, health_handler, orders_handler, products_handler, removed_handler,
    users_v1_handler, users_v2_handler,
};
use crate::static_files::static_router;

/// Read-only state shared by every request
#[derive(Debug)]
pub struct AppState {
    pub simulation: Simulation,
}

/// Mock API server
#[derive(Clone)]
pub struct MockServer {
    state: Arc<AppState>,
    static_dir: PathBuf,
    static_no_cache: bool,
}

impl MockServer {
    pub fn new(cfg: &ServerConfig) -> Self {
        Self {
            state: Arc::new(AppState {
                simulation: cfg.simulation,
            }),
            static_dir: cfg.static_dir.clone(),
            static_no_cache: cfg.static_no_cache,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.state.simulation
    }

    /// Create router
    pub fn router(&self) -> Router {
        let mut router = Router::new();
        for spec in ROUTES {
            router = router.route(spec.path, method_router(spec.endpoint));
        }

        router
            // Everything else falls through to the demo page directory
            .fallback_service(static_router(&self.static_dir, self.static_no_cache))
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Print the route banner and serve on `listener` until `shutdown` resolves
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local = listener.local_addr()?;
        let base_url = format!("http://{}", local);
        println!("{}", routes::render_banner(&base_url, self.simulation()));
        info!("Mock API listening on {}", base_url);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Mock API on {} stopped", base_url);
        Ok(())
    }
}

fn method_router(endpoint: Endpoint) -> MethodRouter<Arc<AppState>> {
    match endpoint {
        Endpoint::UsersV1 => get(users_v1_handler),
        Endpoint::Products => get(products_handler),
        Endpoint::UsersV2 => get(users_v2_handler),
        Endpoint::Analytics => get(analytics_handler),
        Endpoint::Orders => get(orders_handler),
        Endpoint::LegacyEndpoint => get(removed_handler),
        Endpoint::Health => get(health_handler),
    }
}

/// Validate `cfg`, bind its address and serve until Ctrl-C
pub async fn serve(cfg: ServerConfig) -> anyhow::Result<()> {
    cfg.validate()?;
    let addr: SocketAddr = cfg.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    MockServer::new(&cfg)
        .serve_with_shutdown(listener, shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
