//! Plain JSON-RPC endpoint (`POST /rpc`) for clients that speak the
//! single-request MCP subset instead of the streamable HTTP transport, plus
//! the `/` and `/health` status routes.
//!
//! Older plain-JSON clients posted to `/mcp`; that path now belongs to the
//! streamable HTTP transport, which rejects requests without an
//! `Accept: text/event-stream` header. Those clients must switch to `/rpc`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::tools::QualMasterTools;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub mod error_codes {
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INTERNAL_ERROR: i32 = -32603;
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    /// Missing methods fall through to "Method not found".
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

/// Response envelope. `id` is always present, `null` when unknown.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }
}

pub fn server_info() -> Value {
    json!({
        "name": "qualmaster",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Qualitative research methodology and conceptual paper writing assistant",
    })
}

/// Status and compat JSON-RPC routes over the shared tool handler.
pub fn router(tools: QualMasterTools) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/rpc", post(rpc))
        .with_state(tools)
}

async fn root(State(tools): State<QualMasterTools>) -> Json<Value> {
    Json(json!({
        "status": "running",
        "server": server_info(),
        "tools_count": tools.catalog().len(),
    }))
}

async fn health(State(tools): State<QualMasterTools>) -> Json<Value> {
    let semantic = std::sync::Arc::clone(&tools.state().semantic);
    let stats = tokio::task::spawn_blocking(move || semantic.stats())
        .await
        .ok();
    Json(json!({
        "status": "healthy",
        "tools": tools.catalog().len(),
        "semantic": stats,
    }))
}

async fn rpc(State(tools): State<QualMasterTools>, body: Bytes) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(error = %e, "malformed JSON-RPC request");
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::INTERNAL_ERROR,
                    e.to_string(),
                )),
            )
                .into_response();
        }
    };

    if request.method.starts_with("notifications/") {
        tracing::debug!(method = %request.method, "notification received");
        return StatusCode::ACCEPTED.into_response();
    }

    let id = request.id.unwrap_or(Value::Null);
    tracing::debug!(method = %request.method, id = %id, "rpc request");
    let response = dispatch(&tools, &request.method, request.params, id).await;
    Json(response).into_response()
}

async fn dispatch(
    tools: &QualMasterTools,
    method: &str,
    params: Option<Value>,
    id: Value,
) -> JsonRpcResponse {
    match method {
        "initialize" => JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": server_info(),
                "capabilities": { "tools": {} },
            }),
        ),
        "tools/list" => match serde_json::to_value(tools.catalog()) {
            Ok(list) => JsonRpcResponse::success(id, json!({ "tools": list })),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize tool catalog");
                JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string())
            }
        },
        "tools/call" => {
            let params = params.unwrap_or(Value::Null);
            let name = params
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
            let result = match tools.call_by_name(&name, arguments).await {
                Ok(text) => json!({ "content": [{ "type": "text", "text": text }] }),
                Err(text) => {
                    json!({ "content": [{ "type": "text", "text": text }], "isError": true })
                }
            };
            JsonRpcResponse::success(id, result)
        }
        other => {
            tracing::debug!(method = other, "method not found");
            JsonRpcResponse::error(id, error_codes::METHOD_NOT_FOUND, "Method not found")
        }
    }
}
