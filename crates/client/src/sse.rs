//! Incremental decoder for the newline-delimited streaming format.
//!
//! The streaming endpoint emits SSE-style events: `data:` lines carry
//! payloads, a named `error` event carries a JSON object with a `message`
//! field, and blank lines separate events. Payloads that parse as JSON
//! strings are text deltas ("fast" mode); anything else is treated as opaque
//! text and passed through as-is; streamed content is never
//! schema-validated. Partial lines are carried across chunk boundaries.

use serde::Deserialize;

/// One decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A text delta to accumulate.
    Data(String),
    /// An explicit provider error with a human-readable message.
    Error(String),
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: Option<String>,
}

/// Stateful frame decoder; feed it raw chunks as they arrive.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
    pending_event: Option<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk of bytes, returning every frame completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut frames = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline).collect();
            if let Some(frame) = self.handle_line(line.trim_end_matches(['\n', '\r'])) {
                frames.push(frame);
            }
        }
        frames
    }

    fn handle_line(&mut self, line: &str) -> Option<Frame> {
        if line.is_empty() {
            // Event boundary resets the pending event name.
            self.pending_event = None;
            return None;
        }
        if line.starts_with(':') {
            return None;
        }
        if let Some(name) = line.strip_prefix("event:") {
            self.pending_event = Some(name.trim().to_string());
            return None;
        }

        // `data:` payload; anything unprefixed is treated as a bare payload
        // line (malformed chunks are opaque text, not an error).
        let payload = line.strip_prefix("data:").map(|p| p.strip_prefix(' ').unwrap_or(p)).unwrap_or(line);

        if self.pending_event.as_deref() == Some("error") {
            self.pending_event = None;
            let message = serde_json::from_str::<ErrorPayload>(payload)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| "unknown processing error".to_string());
            return Some(Frame::Error(message));
        }

        // Fast mode wraps deltas in JSON strings; raw text passes through.
        match serde_json::from_str::<serde_json::Value>(payload) {
            Ok(serde_json::Value::String(delta)) => Some(Frame::Data(delta)),
            _ => Some(Frame::Data(payload.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_string_payload_is_a_delta() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"data: \"Hello \"\n");
        assert_eq!(frames, vec![Frame::Data("Hello ".to_string())]);
    }

    #[test]
    fn test_raw_text_passes_through() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"data: plain text chunk\n");
        assert_eq!(frames, vec![Frame::Data("plain text chunk".to_string())]);
    }

    #[test]
    fn test_malformed_json_is_opaque_text() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"data: {\"not\": \"a string\"\n");
        assert_eq!(frames, vec![Frame::Data("{\"not\": \"a string\"".to_string())]);
    }

    #[test]
    fn test_named_error_event() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"event: error\ndata: {\"message\": \"model overloaded\"}\n");
        assert_eq!(frames, vec![Frame::Error("model overloaded".to_string())]);
    }

    #[test]
    fn test_error_event_without_message() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"event: error\ndata: {}\n");
        assert_eq!(frames, vec![Frame::Error("unknown processing error".to_string())]);
    }

    #[test]
    fn test_event_name_resets_at_boundary() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"event: error\n\ndata: \"back to data\"\n");
        assert_eq!(frames, vec![Frame::Data("back to data".to_string())]);
    }

    #[test]
    fn test_partial_lines_carry_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: \"spl").is_empty());
        let frames = decoder.feed(b"it\"\ndata: \"next\"\n");
        assert_eq!(
            frames,
            vec![Frame::Data("split".to_string()), Frame::Data("next".to_string())]
        );
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b": keepalive\n\n\ndata: \"x\"\n");
        assert_eq!(frames, vec![Frame::Data("x".to_string())]);
    }

    #[test]
    fn test_crlf_lines() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"data: \"windows\"\r\n");
        assert_eq!(frames, vec![Frame::Data("windows".to_string())]);
    }
}
