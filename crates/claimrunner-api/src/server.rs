//! API server.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use claimrunner_core::Controller;

use crate::error::ApiError;
use crate::http::routes::create_router;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl ApiConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

pub struct ApiServer {
    config: ApiConfig,
    controller: Arc<Controller>,
}

impl ApiServer {
    pub fn new(config: ApiConfig, controller: Arc<Controller>) -> Self {
        Self { config, controller }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Bind the listen socket. The host may be a name such as `localhost`.
    pub async fn bind(&self) -> Result<TcpListener, ApiError> {
        TcpListener::bind((self.config.host.as_str(), self.config.port))
            .await
            .map_err(|source| ApiError::Bind {
                addr: self.addr(),
                source,
            })
    }

    /// Serve until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), ApiError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let app = create_router(self.controller.clone());
        let listener = self.bind().await?;

        match listener.local_addr() {
            Ok(addr) => info!("Control API listening on http://{}", addr),
            Err(_) => info!("Control API listening on http://{}", self.addr()),
        }
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
