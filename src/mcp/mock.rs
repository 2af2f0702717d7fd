use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ClientError;
use crate::mcp::ToolCaller;

/// Scripted `ToolCaller` for tests: replies per tool name and records
/// every call.
pub struct MockToolCaller {
    responses: Mutex<HashMap<String, Vec<Result<Value, String>>>>,
    call_log:  Mutex<Vec<(String, Value)>>,  // (tool, arguments)
}

impl MockToolCaller {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            call_log:  Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful payload for `tool`.
    pub fn respond(self, tool: impl Into<String>, payload: Value) -> Self {
        self.responses.lock().unwrap()
            .entry(tool.into())
            .or_default()
            .push(Ok(payload));
        self
    }

    /// Queue a remote failure for `tool`.
    pub fn fail(self, tool: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses.lock().unwrap()
            .entry(tool.into())
            .or_default()
            .push(Err(message.into()));
        self
    }

    /// Returns the number of times call_tool() was invoked
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    /// Arguments passed to the Nth call of `tool` (0-indexed)
    pub fn arguments_for(&self, tool: &str, n: usize) -> Option<Value> {
        self.call_log.lock().unwrap()
            .iter()
            .filter(|(name, _)| name == tool)
            .nth(n)
            .map(|(_, args)| args.clone())
    }
}

impl Default for MockToolCaller {
    fn default() -> Self { Self::new() }
}

#[async_trait]
impl ToolCaller for MockToolCaller {
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, ClientError> {
        self.call_log.lock().unwrap()
            .push((name.to_string(), arguments));

        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(name).filter(|q| !q.is_empty()).ok_or_else(|| {
            ClientError::Protocol(format!("MockToolCaller: no programmed response for '{}'", name))
        })?;

        match queue.remove(0) {
            Ok(payload) => Ok(payload),
            Err(message) => Err(ClientError::RemoteTool { code: -32000, message, data: None }),
        }
    }
}
