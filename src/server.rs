//! Line-delimited JSON-RPC 2.0 server exposing the tools over stdio.
//!
//! Implements the handful of MCP methods a client needs to discover and call
//! tools: `initialize`, `notifications/initialized`, `ping`, `tools/list` and
//! `tools/call`. Requests are handled one at a time in arrival order.

use crate::tools::ToolBox;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "file-extractor";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

/// An incoming JSON-RPC message.
///
/// Notifications carry no `id` at all; an explicit `"id": null` is kept as
/// `Some(Value::Null)` and still gets a response.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default, deserialize_with = "present_id")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

fn present_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// An outgoing JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    pub fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self::failure(id, RpcError::new(code, message))
    }

    fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Serves a [`ToolBox`] over a line-oriented reader and writer.
pub struct Server {
    tools: ToolBox,
}

impl Server {
    pub fn new(tools: ToolBox) -> Self {
        Self { tools }
    }

    /// Serves stdin/stdout until stdin is closed.
    pub fn run_stdio(&self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run(stdin.lock(), stdout.lock())
    }

    /// Reads one request per line and writes one response per line.
    ///
    /// Returns when the reader reaches end of input. Only I/O errors on the
    /// streams themselves end the loop early.
    pub fn run<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> io::Result<()> {
        info!("{} server running on stdio", SERVER_NAME);
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line) {
                let encoded = serde_json::to_string(&response).map_err(io::Error::other)?;
                writeln!(writer, "{}", encoded)?;
                writer.flush()?;
            }
        }
        info!("Input closed, shutting down");
        Ok(())
    }

    /// Handles one raw message; notifications produce no response.
    ///
    /// Text that is not JSON is a parse error. JSON that is not a request
    /// object is an invalid request.
    pub fn handle_line(&self, line: &str) -> Option<Response> {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!("Unparseable message: {}", e);
                return Some(Response::err(Value::Null, PARSE_ERROR, e.to_string()));
            }
        };
        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: Request = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                warn!("Invalid request: {}", e);
                return Some(Response::err(id, INVALID_REQUEST, e.to_string()));
            }
        };
        self.handle(request)
    }

    pub fn handle(&self, request: Request) -> Option<Response> {
        debug!("Received {}", request.method);
        let Some(id) = request.id.clone() else {
            self.notify(&request);
            return None;
        };
        if request.jsonrpc != "2.0" {
            return Some(Response::err(
                id,
                INVALID_REQUEST,
                format!("Unsupported jsonrpc version '{}'", request.jsonrpc),
            ));
        }

        Some(match self.route(&request) {
            Ok(result) => Response::ok(id, result),
            Err(error) => Response::failure(id, error),
        })
    }

    fn notify(&self, request: &Request) {
        match request.method.as_str() {
            "notifications/initialized" => info!("Client initialized"),
            other => debug!("Ignoring notification {}", other),
        }
    }

    fn route(&self, request: &Request) -> Result<Value, RpcError> {
        match request.method.as_str() {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.tools.definitions() })),
            "tools/call" => {
                let name = request
                    .params
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| RpcError::new(INVALID_PARAMS, "name is required"))?;
                let arguments = request
                    .params
                    .get("arguments")
                    .cloned()
                    .unwrap_or(Value::Null);
                let output = self.tools.call(name, arguments);
                serde_json::to_value(output)
                    .map_err(|e| RpcError::new(INVALID_PARAMS, e.to_string()))
            }
            other => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        }
    }
}
