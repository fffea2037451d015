//! HTTP transport implementation.
//!
//! Serves JSON-RPC over POST plus a Server-Sent Events stream. SSE clients
//! connect to `/sse`, receive an `endpoint` event naming the message path
//! with their session ID, and POST messages there; responses are delivered
//! both on the SSE stream and in the POST body. Every connection gets its
//! own session ID, so concurrent clients never receive each other's
//! responses.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    routing::{get, post},
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;

/// Buffered events per SSE session before sends start failing.
const SESSION_CHANNEL_CAPACITY: usize = 32;

/// SSE keep-alive ping interval.
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Monotonic part of session IDs; the timestamp alone can collide when two
/// clients connect in the same millisecond.
static NEXT_SESSION: AtomicU64 = AtomicU64::new(0);

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }

    /// Unknown SSE session error.
    pub fn unknown_session(id: Option<serde_json::Value>, session: &str) -> Self {
        Self::error(id, -32000, format!("Unknown session: {session}"))
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The MCP server instance.
    server: McpServer,

    /// Open SSE sessions, keyed by session ID.
    sessions: Arc<RwLock<HashMap<String, mpsc::Sender<Event>>>>,

    /// Path SSE clients POST their messages to.
    message_path: String,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();

        let state = AppState {
            server,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            message_path: self.config.message_path.clone(),
        };

        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/sse", get(handle_sse))
            .route(&self.config.message_path, post(handle_message))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(state);

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → JSON-RPC:  POST {}", self.config.rpc_path);
        info!("  → SSE:       GET /sse");
        info!("  → Messages:  POST {}", self.config.message_path);
        info!("  → Health:    GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

fn next_session_id() -> String {
    let counter = NEXT_SESSION.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", chrono::Utc::now().timestamp_millis(), counter)
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP + SSE",
        "endpoints": {
            "rpc": "/mcp",
            "sse": "/sse",
            "messages": state.message_path,
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0"
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Open an SSE stream.
///
/// The first event is an `endpoint` event telling the client where to POST
/// messages, including its session ID. Subsequent events carry responses and
/// resource-list-changed notifications.
async fn handle_sse(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = next_session_id();
    let (tx, rx) = mpsc::channel::<Event>(SESSION_CHANNEL_CAPACITY);
    state
        .sessions
        .write()
        .await
        .insert(session_id.clone(), tx.clone());
    info!("SSE client connected (session {})", session_id);

    spawn_list_changed_forwarder(&state, session_id.clone(), tx);

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{}?sessionId={}", state.message_path, session_id));

    let stream = futures::stream::once(async move { Ok(endpoint) })
        .chain(ReceiverStream::new(rx).map(Ok));

    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

/// Forward resource-registry revision bumps to one SSE session as
/// `notifications/resources/list_changed`.
///
/// Exits and removes the session as soon as the client's stream is dropped,
/// so idle disconnected clients do not linger in the session map.
fn spawn_list_changed_forwarder(state: &AppState, session_id: String, tx: mpsc::Sender<Event>) {
    let mut revisions = state.server.resource_registry().subscribe();
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = revisions.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let notification = serde_json::json!({
                        "jsonrpc": "2.0",
                        "method": "notifications/resources/list_changed"
                    });
                    let event = Event::default()
                        .event("message")
                        .data(notification.to_string());
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                _ = tx.closed() => break,
            }
        }
        sessions.write().await.remove(&session_id);
        debug!("SSE session {} closed", session_id);
    });
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Handle a message POSTed by an SSE client.
///
/// The response goes to the stream identified by the `sessionId` query
/// parameter and is also returned in the POST body.
#[instrument(skip_all, fields(method))]
async fn handle_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    tracing::Span::current().record("method", request.method.as_str());
    info!("Received SSE message: {}", request.method);

    let Some(session_id) = query.session_id else {
        let id = request.id.clone();
        return (
            StatusCode::OK,
            Json(JsonRpcResponse::invalid_params(id, "Missing sessionId")),
        );
    };

    let sender = state.sessions.read().await.get(&session_id).cloned();
    let Some(tx) = sender else {
        warn!("Unknown SSE session: {}", session_id);
        let id = request.id.clone();
        return (
            StatusCode::OK,
            Json(JsonRpcResponse::unknown_session(id, &session_id)),
        );
    };

    let response = process_request(&state, request).await;

    match serde_json::to_string(&response) {
        Ok(data) => {
            let event = Event::default().event("message").data(data);
            if tx.send(event).await.is_err() {
                state.sessions.write().await.remove(&session_id);
                warn!(
                    "SSE session {} disconnected; response returned in body only",
                    session_id
                );
            }
        }
        Err(e) => warn!("Failed to serialize response for SSE delivery: {}", e),
    }

    (StatusCode::OK, Json(response))
}

/// Handle JSON-RPC requests on the plain HTTP endpoint.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    tracing::Span::current().record("method", request.method.as_str());
    info!("Received JSON-RPC request: {}", request.method);

    let response = process_request(&state, request).await;

    (StatusCode::OK, Json(response))
}

/// Process a JSON-RPC request and return the response.
async fn process_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(state, request),

        "tools/list" => handle_tools_list(state, request),

        "tools/manifest" => JsonRpcResponse::success(request.id, state.server.manifest()),

        "tools/call" => handle_tools_call(state, request).await,

        "resources/list" => handle_resources_list(state, request).await,

        "resources/templates/list" => handle_resources_templates_list(state, request).await,

        "resources/read" => handle_resources_read(state, request).await,

        "prompts/list" => handle_prompts_list(state, request).await,

        "prompts/get" => handle_prompts_get(state, request).await,

        "prompts/execute" => handle_prompts_execute(state, request).await,

        "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),

        // Notifications need no response in stateless HTTP mode
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", request.method);
            JsonRpcResponse::success(request.id, serde_json::json!(null))
        }

        // A bare tool name (e.g. "nasa/apod") is dispatched directly; the
        // registry reports unknown tools in the result envelope.
        method if method.contains('/') => {
            let name = method.to_string();
            let arguments = request.params.unwrap_or(serde_json::json!({}));
            tool_result_response(request.id, state.server.call_tool_by_name(&name, arguments).await)
        }

        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

/// Handle initialize request.
fn handle_initialize(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    let result = serde_json::json!({
        "protocolVersion": "2024-11-05",
        "capabilities": {
            "tools": {},
            "resources": {},
            "prompts": {}
        },
        "serverInfo": {
            "name": state.server.name(),
            "version": state.server.version()
        }
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/list request.
fn handle_tools_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");

    let tools = state.server.list_tools();
    JsonRpcResponse::success(request.id, serde_json::json!({ "tools": tools }))
}

/// Handle tools/call request.
async fn handle_tools_call(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/call request");

    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id, "Missing params"),
    };

    let name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id, "Missing tool name"),
    };

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or(serde_json::json!({}));

    tool_result_response(request.id, state.server.call_tool_by_name(&name, arguments).await)
}

fn tool_result_response(
    id: Option<serde_json::Value>,
    result: rmcp::model::CallToolResult,
) -> JsonRpcResponse {
    match serde_json::to_value(&result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::internal_error(id, e.to_string()),
    }
}

/// Handle resources/list request.
async fn handle_resources_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing resources/list request");

    let resources = state.server.list_resources_json().await;
    JsonRpcResponse::success(request.id, serde_json::json!({ "resources": resources }))
}

/// Handle resources/templates/list request.
async fn handle_resources_templates_list(
    state: &AppState,
    request: JsonRpcRequest,
) -> JsonRpcResponse {
    info!("Processing resources/templates/list request");

    let templates = state.server.list_resource_templates_json().await;
    JsonRpcResponse::success(
        request.id,
        serde_json::json!({ "resourceTemplates": templates }),
    )
}

/// Handle resources/read request.
async fn handle_resources_read(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing resources/read request");

    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id, "Missing params"),
    };

    let uri = match params.get("uri").and_then(|v| v.as_str()) {
        Some(u) => u.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id, "Missing resource URI"),
    };

    match state.server.read_resource_json(&uri).await {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::error(request.id, -32002, e),
    }
}

/// Handle prompts/list request.
async fn handle_prompts_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing prompts/list request");

    let prompts = state.server.list_prompts_json().await;
    JsonRpcResponse::success(request.id, serde_json::json!({ "prompts": prompts }))
}

/// Handle prompts/get request.
async fn handle_prompts_get(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing prompts/get request");

    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id, "Missing params"),
    };

    let name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id, "Missing prompt name"),
    };

    let arguments = params.get("arguments").cloned();

    match state.server.get_prompt_json(&name, arguments).await {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::invalid_params(request.id, e),
    }
}

/// Handle prompts/execute request: resolve the prompt to its tool and run it.
async fn handle_prompts_execute(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing prompts/execute request");

    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id, "Missing params"),
    };

    let name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id, "Missing prompt name"),
    };

    let arguments = params.get("arguments").cloned();

    match state.server.execute_prompt(&name, arguments).await {
        Ok(result) => tool_result_response(request.id, result),
        Err(e) => JsonRpcResponse::invalid_params(request.id, e),
    }
}
