use std::sync::Mutex;

use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::mcp::sse::SseDecoder;
use crate::mcp::types::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};

/// `Mcp-Session-Id`, lowercased as `http` requires for static header names.
pub const SESSION_HEADER: &str = "mcp-session-id";

const ACCEPT_BOTH: &str = "application/json, text/event-stream";
const EVENT_STREAM: &str = "text/event-stream";

/// HTTP POST transport for one MCP endpoint.
///
/// Every exchange is a single POST. The server may answer with one JSON
/// document or with an event stream; both are reduced to the JSON-RPC
/// `result` value here.
pub struct HttpTransport {
    client:     reqwest::Client,
    endpoint:   String,
    session_id: Mutex<Option<String>>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client:     builder.build()?,
            endpoint:   config.endpoint.clone(),
            session_id: Mutex::new(None),
        })
    }

    /// The session token last handed out by the server, if any.
    pub fn session_id(&self) -> Option<String> {
        self.session_id.lock().ok().and_then(|s| s.clone())
    }

    /// Send a request and reduce the reply to its `result`.
    pub async fn request(&self, request: &JsonRpcRequest) -> Result<Value, ClientError> {
        tracing::debug!(id = request.id, method = %request.method, "sending MCP request");

        let response = self.post(request).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.contains(EVENT_STREAM) {
            Self::read_event_stream(response).await
        } else {
            let body = response.bytes().await?;
            let parsed: JsonRpcResponse = serde_json::from_slice(&body)?;
            match (parsed.error, parsed.result) {
                (Some(err), _)       => Err(err.into()),
                (None, Some(result)) => Ok(result),
                (None, None)         => Err(ClientError::Protocol(format!(
                    "response to '{}' carried neither result nor error",
                    request.method
                ))),
            }
        }
    }

    /// Fire-and-forget: the reply body is discarded.
    pub async fn notify(&self, notification: &JsonRpcNotification) -> Result<(), ClientError> {
        tracing::debug!(method = %notification.method, "sending MCP notification");
        self.post(notification).await?;
        Ok(())
    }

    async fn post<B: Serialize + ?Sized>(&self, body: &B) -> Result<reqwest::Response, ClientError> {
        let response = self.client
            .post(&self.endpoint)
            .headers(self.request_headers())
            .json(body)
            .send()
            .await?;

        self.capture_session(response.headers());

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status: status.as_u16(), body });
        }
        Ok(response)
    }

    fn request_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_BOTH));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(session) = self.session_id() {
            match HeaderValue::from_str(&session) {
                Ok(value) => { headers.insert(SESSION_HEADER, value); }
                Err(_) => tracing::warn!("session id is not a valid header value, not sending it"),
            }
        }
        headers
    }

    /// The server is authoritative: any session header it sends replaces
    /// what we had.
    fn capture_session(&self, headers: &HeaderMap) {
        let Some(value) = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok()) else {
            return;
        };
        if let Ok(mut slot) = self.session_id.lock() {
            if slot.as_deref() != Some(value) {
                tracing::debug!(session_id = value, "MCP session established");
            }
            *slot = Some(value.to_string());
        }
    }

    async fn read_event_stream(response: reqwest::Response) -> Result<Value, ClientError> {
        let mut decoder = SseDecoder::new();
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            decoder.feed(&chunk?)?;
        }

        if decoder.malformed_events() > 0 {
            tracing::warn!(
                malformed = decoder.malformed_events(),
                "event stream contained unparseable data lines"
            );
        }
        decoder.finish()
    }
}
