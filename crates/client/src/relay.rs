//! The shortcut execution relay.
//!
//! Runs a user-selected instruction against a user-selected model, streaming
//! cumulative output to one event channel, with mid-flight cancellation by
//! task id and a fixed dispatch timeout. Multiple tasks may be in flight at
//! once; events are ordered per task id only.
//!
//! Closure semantics: an upstream close or transport error *after* at least
//! one data frame is benign (providers may drop the connection without a
//! terminal frame once data has flowed) and synthesizes `process_result`; a
//! close with zero data frames surfaces exactly one `process_error`. An
//! explicit `error` event from the stream is always an error, data or not.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use postea_core::{PosteaError, Result, TaskEvent, TaskId, TaskMessage};

use crate::source::{ShortcutRequest, StreamSource};
use crate::sse::{Frame, SseDecoder};

/// Fixed window from dispatch in which *something* (data or a terminal)
/// must arrive.
pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(300);

const EVENT_BUFFER: usize = 64;

/// Dispatches shortcut executions and forwards their event streams.
///
/// Cancellation is advisory-best-effort: the relay stops forwarding and
/// releases its connection handle, but cannot guarantee the upstream
/// provider stops working.
pub struct ShortcutRelay {
    source: Arc<dyn StreamSource>,
    events: mpsc::Sender<TaskMessage>,
    tasks: Arc<Mutex<HashMap<TaskId, CancellationToken>>>,
    timeout: Duration,
}

impl ShortcutRelay {
    /// Creates a relay over a stream source, returning the receiving half of
    /// its event channel.
    pub fn new(source: Arc<dyn StreamSource>) -> (Self, mpsc::Receiver<TaskMessage>) {
        Self::with_timeout(source, DISPATCH_TIMEOUT)
    }

    /// Creates a relay with an explicit dispatch timeout (tests shrink it).
    pub fn with_timeout(source: Arc<dyn StreamSource>, timeout: Duration) -> (Self, mpsc::Receiver<TaskMessage>) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let relay = Self { source, events: tx, tasks: Arc::new(Mutex::new(HashMap::new())), timeout };
        (relay, rx)
    }

    /// Number of tasks currently in flight.
    pub fn in_flight(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Begins executing a request. Returns immediately; all results arrive
    /// on the event channel under the request's task id.
    pub fn dispatch(&self, request: ShortcutRequest) -> Result<TaskId> {
        let task_id = request.task_id;
        let token = CancellationToken::new();
        {
            let mut tasks = self.tasks.lock().unwrap();
            if tasks.contains_key(&task_id) {
                return Err(PosteaError::Processing(format!("task {task_id} is already in flight")));
            }
            tasks.insert(task_id, token.clone());
        }

        tracing::debug!(%task_id, shortcut = %request.shortcut_name, model = %request.model.id, "dispatch");

        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        let tasks = Arc::clone(&self.tasks);
        let timeout = self.timeout;
        tokio::spawn(async move {
            run_task(source, request, events, token, timeout).await;
            tasks.lock().unwrap().remove(&task_id);
        });

        Ok(task_id)
    }

    /// Requests termination of one task. Events already in the channel are
    /// the consumer's to drop (by task id); nothing further is forwarded.
    pub fn cancel(&self, task_id: TaskId) {
        if let Some(token) = self.tasks.lock().unwrap().remove(&task_id) {
            tracing::debug!(%task_id, "cancel");
            token.cancel();
        }
    }
}

/// Forwards one event unless the task has been cancelled. Returns `false`
/// when forwarding must stop.
async fn forward(
    events: &mpsc::Sender<TaskMessage>, token: &CancellationToken, task_id: TaskId, event: TaskEvent,
) -> bool {
    if token.is_cancelled() {
        return false;
    }
    events.send(TaskMessage::new(task_id, event)).await.is_ok()
}

/// Terminal event for an upstream closure without an explicit terminal
/// frame. Data seen → benign closure; no data → error.
fn terminal_for_closure(received_data: bool, error: Option<PosteaError>) -> TaskEvent {
    if received_data {
        TaskEvent::ProcessResult
    } else {
        let message = match error {
            Some(err) => err.to_string(),
            None => "the stream closed before any data arrived".to_string(),
        };
        TaskEvent::ProcessError { message }
    }
}

async fn run_task(
    source: Arc<dyn StreamSource>, request: ShortcutRequest, events: mpsc::Sender<TaskMessage>,
    token: CancellationToken, timeout: Duration,
) {
    let task_id = request.task_id;

    let mut stream = match source.open(&request).await {
        Ok(stream) => stream,
        Err(err) => {
            tracing::warn!(%task_id, error = %err, "failed to open stream");
            forward(&events, &token, task_id, TaskEvent::ProcessError { message: err.to_string() }).await;
            return;
        }
    };

    if !forward(&events, &token, task_id, TaskEvent::ProcessingStart).await {
        return;
    }

    let mut decoder = SseDecoder::new();
    let mut accumulated = String::new();
    let mut received_data = false;
    let deadline = sleep(timeout);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                // Dropping the stream releases the connection; no terminal
                // event is forwarded for a cancelled task.
                tracing::debug!(%task_id, "cancelled, releasing stream");
                return;
            }
            _ = &mut deadline, if !received_data => {
                tracing::warn!(%task_id, "dispatch timed out with no data");
                let message = format!("processing timed out after {} seconds", timeout.as_secs());
                forward(&events, &token, task_id, TaskEvent::ProcessError { message }).await;
                return;
            }
            chunk = stream.next() => match chunk {
                Some(Ok(bytes)) => {
                    for frame in decoder.feed(&bytes) {
                        match frame {
                            Frame::Data(delta) => {
                                received_data = true;
                                accumulated.push_str(&delta);
                                let event = TaskEvent::ProcessData { text: accumulated.clone() };
                                if !forward(&events, &token, task_id, event).await {
                                    return;
                                }
                            }
                            // An explicit error event is terminal even after
                            // data has flowed.
                            Frame::Error(message) => {
                                forward(&events, &token, task_id, TaskEvent::ProcessError { message }).await;
                                return;
                            }
                        }
                    }
                }
                Some(Err(err)) => {
                    tracing::debug!(%task_id, error = %err, received_data, "transport error");
                    forward(&events, &token, task_id, terminal_for_closure(received_data, Some(err))).await;
                    return;
                }
                None => {
                    forward(&events, &token, task_id, terminal_for_closure(received_data, None)).await;
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_after_data_is_benign() {
        assert_eq!(terminal_for_closure(true, None), TaskEvent::ProcessResult);
        assert_eq!(
            terminal_for_closure(true, Some(PosteaError::Http("reset".to_string()))),
            TaskEvent::ProcessResult
        );
    }

    #[test]
    fn test_closure_without_data_is_an_error() {
        assert!(matches!(terminal_for_closure(false, None), TaskEvent::ProcessError { .. }));
        let event = terminal_for_closure(false, Some(PosteaError::Http("refused".to_string())));
        match event {
            TaskEvent::ProcessError { message } => assert!(message.contains("refused")),
            other => panic!("expected ProcessError, got {other:?}"),
        }
    }
}
