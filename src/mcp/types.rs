use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION:  &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 Request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id:      u64,
    pub method:  String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params:  Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method:  method.into(),
            params,
        }
    }
}

/// JSON-RPC 2.0 Response
///
/// Exactly one of `result` / `error` is meaningful. The id is kept loose
/// because some servers echo it as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id:      Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub result:  Option<Value>,
    #[serde(default)]
    pub error:   Option<JsonRpcError>,
}

/// A present field is `Some` even when it holds `null`; only an absent one
/// falls back to `None`.
fn present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(d).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code:    i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data:    Option<Value>,
}

/// JSON-RPC 2.0 Notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method:  String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params:  Option<Value>,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method:  method.into(),
            params,
        }
    }
}

// --- MCP Specific Types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeRequestParams {
    pub protocol_version: String,
    pub capabilities:     Value,
    pub client_info:      ClientInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name:    String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    #[serde(default)]
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities:     Value,
    pub server_info:      Option<ServerInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name:    String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListToolsResult {
    #[serde(default)]
    pub tools: Vec<McpTool>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name:         String,
    pub description:  Option<String>,
    pub input_schema: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallToolRequestParams {
    pub name:      String,
    pub arguments: Value,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    #[serde(default)]
    pub content:  Vec<McpContent>,
    #[serde(default)]
    pub is_error: bool,
}

impl CallToolResult {
    /// The first `text` content item, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|c| match c {
            McpContent::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum McpContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image")]
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    #[serde(rename = "resource")]
    Resource { resource: Value },
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_result_is_kept_apart_from_a_missing_one() {
        let with_null: JsonRpcResponse =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 1, "result": null })).unwrap();
        assert_eq!(with_null.result, Some(Value::Null));

        let without: JsonRpcResponse =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": -1, "message": "x" } })).unwrap();
        assert_eq!(without.result, None);
    }
}
