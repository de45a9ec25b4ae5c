//! # API Module
//!
//! HTTP handlers for the Solidity forge server. Every route lives under `/api`.
//!
//! ## Available Endpoints
//!
//! ### Templates
//! - `GET /templates` - List contract templates
//! - `GET /templates/:id` - Get one template
//! - `POST /templates/:id/visible` - Parameters shown for a mode and values
//! - `POST /templates/:id/generate` - Generate code from template values
//!
//! ### Flows
//! - `POST /flows/generate-code`
//! - `POST /flows/refine-code`
//! - `POST /flows/explain-parameter`
//! - `POST /flows/estimate-gas`
//! - `POST /flows/error-prevention`
//! - `POST /flows/documentation`
//! - `POST /flows/test-cases`
//! - `POST /flows/find-addresses`
//!
//! ### Other
//! - `GET /addresses` - Direct known-address lookup
//! - `POST /leads` - Lead capture
//! - `POST /rpc` - JSON-RPC bridge to the MCP dispatcher
//! - `GET /health`

use axum::{
    extract::{FromRequest, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    flows::FlowError,
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    AppState,
};

pub mod addresses;
pub mod flows;
pub mod health;
pub mod leads;
pub mod templates;

/// JSON body extractor whose rejections (bad syntax, missing or ill-typed
/// fields) come back as 400 with a JSON error body.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(FlowError))]
pub struct ApiJson<T>(pub T);

/// Builds the full application router, nested under `/api`.
pub fn create_router(state: AppState) -> Router {
    let api_router = Router::new()
        // Health check
        .route("/health", get(health::health_handler))

        // Templates
        .merge(templates::create_template_router())

        // Model-backed flows
        .merge(flows::create_flow_router())

        // Static lookups and lead capture
        .route("/addresses", get(addresses::lookup_addresses_handler))
        .route("/leads", post(leads::save_lead_handler))

        // JSON-RPC endpoint for MCP tool calls
        .route("/rpc", post(rpc_handler));

    Router::new()
        .nest("/api", api_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// Forward JSON-RPC requests over HTTP to the MCP handler
async fn rpc_handler(State(state): State<AppState>, Json(req): Json<Request>) -> Json<Response> {
    match handle_mcp_request(req, state).await {
        Some(resp) => Json(resp),
        None => Json(Response::error(
            serde_json::Value::Null,
            error_codes::INVALID_REQUEST,
            "Notifications are not supported over HTTP".into(),
        )),
    }
}
