//! MCP server over stdio.
//!
//! Newline-delimited JSON-RPC 2.0 on stdin/stdout. Logging goes to stderr,
//! stdout carries protocol frames only.

use crate::protocol::{
    negotiate_protocol_version, CallToolParams, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo,
    ToolsCapability,
};
use crate::tools::ToolRegistry;
use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "odoo";

const INSTRUCTIONS: &str = "Odoo Project Management MCP server. Use these tools to create and \
manage tasks in Odoo. A typical workflow: odoo_list_projects -> odoo_get_project_stages -> \
create tasks (with parent_id for subtasks). When turning a PRD into tasks, create parent tasks \
as epics first, then create subtasks under them using parent_id.";

pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve on the process's stdin and stdout until stdin closes.
    pub async fn start(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve requests read line by line from `reader`, writing one response
    /// line per request to `writer`. Returns when the reader reaches EOF.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(tools = self.registry.len(), "MCP server started on stdio");

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_message(line.trim()).await,
                Err(e) => {
                    warn!(error = %e, "Frame is not valid UTF-8");
                    Some(JsonRpcResponse::error(
                        serde_json::Value::Null,
                        JsonRpcError::parse_error(e),
                    ))
                }
            };
            let Some(response) = response else {
                continue;
            };

            let mut frame = serde_json::to_vec(&response)?;
            frame.push(b'\n');
            writer.write_all(&frame).await?;
            writer.flush().await?;
        }

        info!("stdin closed, MCP server stopping");
        Ok(())
    }

    /// Handle one raw frame. `None` means nothing is written back.
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Unparseable frame");
                return Some(JsonRpcResponse::error(
                    serde_json::Value::Null,
                    JsonRpcError::parse_error(e),
                ));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(value.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = value.get("id").cloned().unwrap_or(serde_json::Value::Null);
                return Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_request(format!("Invalid request: {}", e)),
                ));
            }
        };

        if request.is_notification() {
            debug!(method = %request.method, "Notification");
            return None;
        }

        Some(self.handle_request(request).await)
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.unwrap_or(serde_json::Value::Null);
        let params = request.params.unwrap_or(serde_json::Value::Null);
        debug!(method = %request.method, "Request");

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id, params),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                ListToolsResult {
                    tools: self.registry.list_schemas(),
                },
            ),
            "tools/call" => self.handle_tools_call(id, params).await,
            method => JsonRpcResponse::error(id, JsonRpcError::method_not_found(method)),
        }
    }

    fn handle_initialize(&self, id: serde_json::Value, params: serde_json::Value) -> JsonRpcResponse {
        let params: InitializeParams = serde_json::from_value(params).unwrap_or_default();
        if let Some(client) = &params.client_info {
            info!(client = %client.name, version = %client.version, "Client connected");
        }

        JsonRpcResponse::success(
            id,
            InitializeResult {
                protocol_version: negotiate_protocol_version(params.protocol_version.as_deref())
                    .to_string(),
                capabilities: ServerCapabilities {
                    tools: Some(ToolsCapability {
                        list_changed: false,
                    }),
                },
                server_info: ServerInfo {
                    name: SERVER_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
                instructions: Some(INSTRUCTIONS.to_string()),
            },
        )
    }

    async fn handle_tools_call(&self, id: serde_json::Value, params: serde_json::Value) -> JsonRpcResponse {
        let params: CallToolParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)),
                )
            }
        };

        match self.registry.call(&params.name, params.arguments).await {
            Some(result) => JsonRpcResponse::success(id, result),
            None => JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server() -> McpServer {
        McpServer::new(ToolRegistry::new())
    }

    #[tokio::test]
    async fn test_parse_error_has_null_id() {
        let response = server().handle_message("{not json").await.unwrap();

        assert_eq!(response.id, serde_json::Value::Null);
        assert_eq!(response.error.unwrap().code, -32700);
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let response = server()
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = server()
            .handle_message(r#"{"jsonrpc":"2.0","id":7,"method":"resources/list"}"#)
            .await
            .unwrap();

        assert_eq!(response.id, json!(7));
        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "Method not found: resources/list");
    }

    #[tokio::test]
    async fn test_missing_method_is_invalid_request() {
        let response = server()
            .handle_message(r#"{"jsonrpc":"2.0","id":"a"}"#)
            .await
            .unwrap();

        assert_eq!(response.id, json!("a"));
        assert_eq!(response.error.unwrap().code, -32600);
    }

    #[tokio::test]
    async fn test_initialize_negotiates_version() {
        let response = server()
            .handle_message(
                r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","clientInfo":{"name":"test","version":"1"}}}"#,
            )
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "odoo");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
        assert!(result["instructions"].as_str().unwrap().contains("parent_id"));
    }

    #[tokio::test]
    async fn test_tools_call_without_name() {
        let response = server()
            .handle_message(r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{}}"#)
            .await
            .unwrap();

        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let response = server()
            .handle_message(
                r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"odoo_nope"}}"#,
            )
            .await
            .unwrap();

        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert_eq!(error.message, "Unknown tool: odoo_nope");
    }
}
