//! Streaming-task model: event wire types and the consumer-side reducer.
//!
//! A task is one in-flight AI-shortcut execution. It is identified by a
//! client-generated id, receives zero or more cumulative data events, and
//! ends with exactly one terminal event (result or error) unless cancelled
//! first. [`TaskView`] is the pure reducer over that event stream; it holds
//! the rules every consumer must follow: mismatched ids are dropped, data
//! replaces the buffer wholesale, nothing is applied after a terminal event
//! or a cancellation.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client-generated identifier correlating dispatch, stream events, and
/// cancellation for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generates a fresh id, unique among in-flight tasks.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One event of the shortcut streaming protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// Emitted once when the provider call has been accepted.
    ProcessingStart,
    /// Carries the *cumulative* accumulated text so far, not a delta.
    ProcessData { text: String },
    /// Terminal: successful completion.
    ProcessResult,
    /// Terminal: failure with a human-readable message.
    ProcessError { message: String },
}

impl TaskEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskEvent::ProcessResult | TaskEvent::ProcessError { .. })
    }
}

/// An event addressed to a specific task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMessage {
    pub task_id: TaskId,
    #[serde(flatten)]
    pub event: TaskEvent,
}

impl TaskMessage {
    pub fn new(task_id: TaskId, event: TaskEvent) -> Self {
        Self { task_id, event }
    }
}

/// Lifecycle phase of a tracked task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    /// Dispatched, no event received yet.
    Pending,
    /// The provider accepted the call; data may be flowing.
    Streaming,
    /// Terminal: completed successfully.
    Done,
    /// Terminal: failed.
    Failed,
    /// Locally cancelled; all further events are dropped.
    Cancelled,
}

impl TaskPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskPhase::Done | TaskPhase::Failed | TaskPhase::Cancelled)
    }
}

/// Consumer-side state of one task: the displayed buffer plus lifecycle
/// phase, advanced by [`TaskView::apply`].
#[derive(Debug, Clone)]
pub struct TaskView {
    task_id: TaskId,
    phase: TaskPhase,
    buffer: String,
    error: Option<String>,
}

impl TaskView {
    /// Starts tracking a freshly dispatched task.
    pub fn new(task_id: TaskId) -> Self {
        Self { task_id, phase: TaskPhase::Pending, buffer: String::new(), error: None }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn phase(&self) -> TaskPhase {
        self.phase
    }

    /// The displayed text: always the payload of the most recently applied
    /// data event.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Marks the task cancelled. Events still in flight for this id are
    /// ignored from here on.
    pub fn cancel(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = TaskPhase::Cancelled;
        }
    }

    /// Applies one message, returning `true` when it changed this view.
    ///
    /// Messages for a different task id, and any message arriving after a
    /// terminal event or a cancellation, are dropped.
    pub fn apply(&mut self, message: &TaskMessage) -> bool {
        if message.task_id != self.task_id || self.phase.is_terminal() {
            return false;
        }

        match &message.event {
            TaskEvent::ProcessingStart => {
                self.phase = TaskPhase::Streaming;
            }
            TaskEvent::ProcessData { text } => {
                self.phase = TaskPhase::Streaming;
                // Cumulative replace, never append.
                self.buffer.clear();
                self.buffer.push_str(text);
            }
            TaskEvent::ProcessResult => {
                self.phase = TaskPhase::Done;
            }
            TaskEvent::ProcessError { message } => {
                self.phase = TaskPhase::Failed;
                self.error = Some(message.clone());
            }
        }
        true
    }
}
