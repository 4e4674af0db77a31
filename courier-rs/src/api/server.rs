//! API Server - HTTP front door for the dispatcher

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::handlers::{self, AppState};
use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;

/// API Server configuration
pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
    allowed_origins: Vec<String>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(dispatcher: Arc<Dispatcher>, config: &ServerConfig) -> Self {
        Self {
            state: Arc::new(AppState { dispatcher }),
            addr: config.listen_addr.clone(),
            allowed_origins: config.allowed_origins.clone(),
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        let router = Router::new()
            .route("/ping", get(handlers::ping))
            .route("/email/send", post(handlers::send_email))
            .route("/email/queue/status", get(handlers::queue_status))
            .route("/email/last/status", get(handlers::last_status))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone());

        match cors_layer(&self.allowed_origins) {
            Some(cors) => router.layer(cors),
            None => router,
        }
    }

    /// Bind the listener and serve until shutdown
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("Server listens on {}", self.addr);

        axum::serve(listener, router).await?;

        Ok(())
    }
}

/// CORS restricted to the configured origins; `*` allows any origin.
/// Returns `None` when no origin is configured.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return Some(cors.allow_origin(Any));
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(cors.allow_origin(AllowOrigin::list(parsed)))
}
