pub mod types;
pub mod sse;
pub mod transport;
pub mod client;
mod mock;

pub use client::{McpClient, unwrap_tool_result};
pub use mock::MockToolCaller;
pub use sse::SseDecoder;
pub use transport::{HttpTransport, SESSION_HEADER};
pub use types::{CallToolResult, JsonRpcError, McpContent, McpTool};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

/// The seam between domain queries and the remote service.
///
/// # Contract
/// - Returns the unwrapped tool payload (parsed JSON, or a JSON string when
///   the tool answered with plain text)
/// - Returns `ClientError::RemoteTool` when the service reports an error
/// - Must be Send + Sync so queries can run concurrently against one caller
#[async_trait]
pub trait ToolCaller: Send + Sync {
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, ClientError>;
}

/// `call_tool`, then deserialize the payload into `T`.
pub async fn call_tool_as<T: DeserializeOwned>(
    caller:    &dyn ToolCaller,
    name:      &str,
    arguments: Value,
) -> Result<T, ClientError> {
    let payload = caller.call_tool(name, arguments).await?;
    serde_json::from_value(payload).map_err(|e| {
        tracing::debug!(tool = name, error = %e, "tool payload did not match the expected shape");
        ClientError::Decode(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Weather {
        city:    String,
        celsius: i32,
    }

    #[tokio::test]
    async fn typed_call_decodes_payload() {
        let mock = MockToolCaller::new().respond("weather", json!({ "city": "Bern", "celsius": 21 }));
        let got: Weather = call_tool_as(&mock, "weather", json!({ "city": "Bern" })).await.unwrap();
        assert_eq!(got, Weather { city: "Bern".into(), celsius: 21 });
        assert_eq!(mock.arguments_for("weather", 0), Some(json!({ "city": "Bern" })));
    }

    #[tokio::test]
    async fn typed_call_with_wrong_shape_is_a_decode_error() {
        let mock = MockToolCaller::new().respond("weather", json!("sunny"));
        let err = call_tool_as::<Weather>(&mock, "weather", json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn typed_call_passes_remote_errors_through() {
        let mock = MockToolCaller::new().fail("weather", "station offline");
        let err = call_tool_as::<Weather>(&mock, "weather", json!({})).await.unwrap_err();
        assert!(err.is_remote());
    }
}
