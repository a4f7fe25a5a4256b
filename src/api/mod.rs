//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// HTTP transport over the matching engine, built on axum. The transport is a
// thin adapter: it deserializes the wire shapes, calls the engine, and maps
// engine results and errors to status codes. All market semantics live in the
// engine.
//
// | Component | Description                                   |
// |-----------|-----------------------------------------------|
// | AppState  | Shared handler state (engine + defaults).     |
// | Api       | Router assembly and server loop.              |
// | routes    | Handler functions per endpoint.               |
// | dto       | Request/response wire shapes.                 |
// | error     | ApiError and its status-code mapping.         |
//--------------------------------------------------------------------------------------------------

mod dto;
mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{delete, get, post},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::engine::MatchingEngine;

pub use dto::{CancelResponse, CreateOrderRequest, OrderResponse};
pub use error::{ApiError, ApiResult};

/// Shared application state accessible by all handlers.
pub struct AppState {
    pub engine: Arc<MatchingEngine>,
    /// Depth level cap applied when the request does not specify one.
    pub default_depth: usize,
}

/// The API server: address plus shared state.
pub struct Api {
    addr: SocketAddr,
    state: Arc<AppState>,
}

impl Api {
    pub fn new(addr: SocketAddr, engine: Arc<MatchingEngine>, default_depth: usize) -> Self {
        let state = Arc::new(AppState {
            engine,
            default_depth,
        });
        Self { addr, state }
    }

    /// Builds the router with all endpoints and shared layers attached.
    pub fn routes(&self) -> Router {
        Router::new()
            .route("/health", get(routes::health))
            .route("/orders", post(routes::create_order))
            .route("/orders/:order_id", delete(routes::cancel_order))
            .route("/symbols/:symbol/bbo", get(routes::get_bbo))
            .route("/symbols/:symbol/depth", get(routes::get_depth))
            .layer(Extension(self.state.clone()))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Binds and serves until shutdown.
    pub async fn serve(self) -> std::io::Result<()> {
        let app = self.routes();
        info!("API listening on {}", self.addr);
        let listener = TcpListener::bind(self.addr).await?;
        axum::serve(listener, app).await
    }
}
