//! Incremental decoder for `text/event-stream` JSON-RPC replies.
//!
//! The decoder is fed raw body chunks as they arrive. Complete lines are
//! split off, a trailing partial line is carried over to the next chunk, and
//! every `data: ` line is tried as a JSON-RPC response. Later results replace
//! earlier ones; an error event ends decoding immediately.

use serde_json::Value;

use crate::error::ClientError;
use crate::mcp::types::JsonRpcResponse;

const DATA_PREFIX: &str = "data: ";

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer:      Vec<u8>,
    /// Prefix of `buffer` already known to hold no newline.
    scanned:     usize,
    last_result: Option<Value>,
    events:      usize,
    malformed:   usize,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one chunk of the body.
    ///
    /// Returns `Err` as soon as a complete event carries a JSON-RPC error.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), ClientError> {
        self.buffer.extend_from_slice(chunk);

        let buffer = std::mem::take(&mut self.buffer);
        let mut consumed = 0;
        let mut from = self.scanned;
        let mut outcome = Ok(());

        while let Some(rel) = buffer[from..].iter().position(|b| *b == b'\n') {
            let end = from + rel;
            let line = &buffer[consumed..end];
            consumed = end + 1;
            from = consumed;
            if let Err(e) = self.process_line(line) {
                outcome = Err(e);
                break;
            }
        }

        self.buffer = buffer;
        self.buffer.drain(..consumed);
        // After an error the remainder was never scanned.
        self.scanned = if outcome.is_ok() { self.buffer.len() } else { 0 };
        outcome
    }

    /// End of stream: flush an unterminated final line and hand back the
    /// last result seen.
    pub fn finish(mut self) -> Result<Value, ClientError> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.process_line(&rest)?;
        }

        tracing::debug!(
            events    = self.events,
            malformed = self.malformed,
            "event stream finished"
        );

        self.last_result
            .ok_or_else(|| ClientError::Protocol("no result received".to_string()))
    }

    /// Number of `data:` events that were not valid JSON-RPC responses.
    pub fn malformed_events(&self) -> usize {
        self.malformed
    }

    /// Number of `data:` events that parsed.
    pub fn events(&self) -> usize {
        self.events
    }

    fn process_line(&mut self, raw: &[u8]) -> Result<(), ClientError> {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = String::from_utf8_lossy(raw);

        let Some(data) = line.strip_prefix(DATA_PREFIX) else {
            return Ok(());
        };

        match serde_json::from_str::<JsonRpcResponse>(data) {
            Ok(resp) => {
                self.events += 1;
                if let Some(err) = resp.error {
                    return Err(err.into());
                }
                if let Some(result) = resp.result {
                    self.last_result = Some(result);
                }
            }
            Err(e) => {
                self.malformed += 1;
                tracing::debug!(error = %e, "skipping malformed event-stream data line");
            }
        }
        Ok(())
    }
}
