//! Server management - running the mock API in-process and health checking it

use std::net::SocketAddr;
use std::time::Duration;

use mockapi_web::{MockServer, ServerConfig};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

/// Handle to a running server task
pub struct ServerHandle {
    task: JoinHandle<anyhow::Result<()>>,
    pub base_url: String,
    pub port: u16,
}

impl ServerHandle {
    /// Bind and start the mock API, returning once `/health` answers
    pub async fn spawn(config: HarnessConfig) -> E2eResult<Self> {
        config.server.validate()?;
        let addr: SocketAddr = config.server.socket_addr()?;

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            E2eError::ServerStartup(format!("Failed to bind {}: {}", addr, e))
        })?;
        let port = listener.local_addr()?.port();
        let base_url = format!("http://{}:{}", addr.ip(), port);

        info!("Spawning mock API on port {}", port);

        let server = MockServer::new(&config.server);
        let task = tokio::spawn(server.serve_with_shutdown(listener, std::future::pending()));

        let handle = ServerHandle {
            task,
            base_url: base_url.clone(),
            port,
        };

        handle.wait_for_healthy(config.startup_timeout).await?;

        info!("Server is healthy at {}", base_url);
        Ok(handle)
    }

    /// Wait for the server to respond to health checks
    async fn wait_for_healthy(&self, timeout_duration: Duration) -> E2eResult<()> {
        let health_url = format!("{}/health", self.base_url);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = std::time::Instant::now();
        let mut attempts = 0;

        while start.elapsed() < timeout_duration {
            attempts += 1;

            if self.task.is_finished() {
                return Err(E2eError::ServerStartup(
                    "server task exited before becoming healthy".to_string(),
                ));
            }

            match client.get(&health_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    return Ok(());
                }
                Ok(resp) => {
                    warn!("Health check returned {}", resp.status());
                }
                Err(e) => {
                    if !e.is_connect() {
                        warn!("Health check error: {}", e);
                    }
                }
            }

            sleep(Duration::from_millis(50)).await;
        }

        Err(E2eError::ServerHealthCheck(attempts))
    }

    /// Get the base URL for this server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stop the server. In-flight requests are dropped.
    pub fn stop(&mut self) {
        if !self.task.is_finished() {
            info!("Stopping mock API on port {}", self.port);
        }
        self.task.abort();
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Configuration for spawning a server
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Server settings; port 0 picks a free port
    pub server: ServerConfig,

    /// Timeout for server startup
    pub startup_timeout: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 0,
                ..Default::default()
            },
            startup_timeout: Duration::from_secs(10),
        }
    }
}
