use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::mcp::transport::HttpTransport;
use crate::mcp::types::*;
use crate::mcp::ToolCaller;

/// Client for one remote MCP endpoint.
///
/// Request ids and the session token live on the instance, so independent
/// clients (and tests) never share state.
pub struct McpClient {
    transport: HttpTransport,
    next_id:   AtomicU64,
    info:      ClientInfo,
}

impl McpClient {
    /// Builds the client. No traffic is sent until `initialize`.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
            next_id:   AtomicU64::new(1),
            info:      ClientInfo {
                name:    config.client_name.clone(),
                version: config.client_version.clone(),
            },
        })
    }

    /// Build and run the handshake, bounded by `config.init_timeout`.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Self::new(config)?;
        client.initialize_within(config.init_timeout).await?;
        Ok(client)
    }

    pub fn session_id(&self) -> Option<String> {
        self.transport.session_id()
    }

    async fn send_request_internal(&self, method: &str, params: Option<Value>) -> Result<Value, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest::new(id, method, params);
        self.transport.request(&request).await
    }

    /// `initialize` followed by the `notifications/initialized` notification.
    pub async fn initialize(&self) -> Result<Option<InitializeResult>, ClientError> {
        let params = InitializeRequestParams {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities:     json!({}),
            client_info:      self.info.clone(),
        };

        let result = self
            .send_request_internal("initialize", Some(serde_json::to_value(params)?))
            .await
            .map_err(|e| ClientError::Protocol(format!("initialize failed: {}", e)))?;

        if let Err(e) = self.send_notification("notifications/initialized", None).await {
            tracing::warn!(error = %e, "initialized notification was not accepted");
        }

        let info = serde_json::from_value::<InitializeResult>(result).ok();
        if let Some(server) = info.as_ref().and_then(|i| i.server_info.as_ref()) {
            tracing::info!(server = %server.name, version = %server.version, "MCP session initialized");
        }
        Ok(info)
    }

    /// Races `initialize` against a timer. Only our wait is bounded; the
    /// request itself is dropped, not cancelled server-side.
    pub async fn initialize_within(&self, limit: Duration) -> Result<Option<InitializeResult>, ClientError> {
        match tokio::time::timeout(limit, self.initialize()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout = ?limit, "MCP initialize timed out");
                Err(ClientError::Timeout(limit))
            }
        }
    }

    pub async fn send_notification(&self, method: &str, params: Option<Value>) -> Result<(), ClientError> {
        let notif = JsonRpcNotification::new(method, params);
        self.transport.notify(&notif).await
    }

    pub async fn list_tools(&self) -> Result<Vec<McpTool>, ClientError> {
        let result = self.send_request_internal("tools/list", Some(json!({}))).await?;
        let listed: ListToolsResult = serde_json::from_value(result)?;
        Ok(listed.tools)
    }

    /// Calls a tool and unwraps its content envelope.
    ///
    /// The first `text` item is parsed as JSON when possible and returned as a
    /// plain string otherwise. Without a text item the raw result is returned.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, ClientError> {
        let params = serde_json::to_value(CallToolRequestParams {
            name: name.to_string(),
            arguments,
        })?;

        let result = self.send_request_internal("tools/call", Some(params)).await?;
        Ok(unwrap_tool_result(name, result))
    }
}

#[async_trait]
impl ToolCaller for McpClient {
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, ClientError> {
        McpClient::call_tool(self, name, arguments).await
    }
}

/// Reduce a `tools/call` result to the payload callers care about.
pub fn unwrap_tool_result(name: &str, result: Value) -> Value {
    let envelope: CallToolResult = match serde_json::from_value(result.clone()) {
        Ok(env) => env,
        Err(_) => return result,
    };

    if envelope.is_error {
        tracing::warn!(tool = name, "tool reported isError");
    }

    match envelope.first_text() {
        Some(text) => serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())),
        None => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_text_content_is_parsed() {
        let result = json!({
            "content": [{ "type": "text", "text": "{\"results\":[],\"results_count\":0}" }]
        });
        assert_eq!(unwrap_tool_result("t", result), json!({"results": [], "results_count": 0}));
    }

    #[test]
    fn plain_text_content_is_returned_raw() {
        let result = json!({ "content": [{ "type": "text", "text": "Grüezi!" }] });
        assert_eq!(unwrap_tool_result("t", result), json!("Grüezi!"));
    }

    #[test]
    fn first_text_item_wins_over_images() {
        let result = json!({
            "content": [
                { "type": "image", "data": "AAAA", "mimeType": "image/png" },
                { "type": "text", "text": "[1,2,3]" },
                { "type": "text", "text": "ignored" }
            ]
        });
        assert_eq!(unwrap_tool_result("t", result), json!([1, 2, 3]));
    }

    #[test]
    fn result_without_text_is_returned_as_is() {
        let result = json!({ "content": [{ "type": "resource", "resource": { "uri": "x" } }] });
        assert_eq!(unwrap_tool_result("t", result.clone()), result);
    }

    #[test]
    fn non_envelope_result_is_returned_as_is() {
        let result = json!({ "something": "else", "content": 3 });
        assert_eq!(unwrap_tool_result("t", result.clone()), result);
    }

    #[test]
    fn request_ids_increase_per_instance() {
        let config = ClientConfig::new("http://localhost:1/mcp");
        let a = McpClient::new(&config).unwrap();
        let b = McpClient::new(&config).unwrap();
        assert_eq!(a.next_id.fetch_add(1, Ordering::SeqCst), 1);
        assert_eq!(a.next_id.fetch_add(1, Ordering::SeqCst), 2);
        assert_eq!(b.next_id.fetch_add(1, Ordering::SeqCst), 1);
    }
}
