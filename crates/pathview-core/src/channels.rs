//! Collaborator-facing queues
//!
//! The pipeline never talks to the user or the machine directly. User
//! notifications go onto a [`MessageQueue`] drained by the hosting
//! application's notification area; ready-to-send command strings go onto
//! a [`CommandQueue`] drained by whatever owns the controller connection.
//!
//! Both are cheap cloneable handles over `parking_lot`-guarded deques so a
//! collaborator on another thread can drain them while the single-threaded
//! pipeline keeps pushing.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Severity of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageLevel {
    /// Informational
    Info,
    /// Something the user should act on (e.g. a truncated render)
    Warning,
    /// A failed operation (e.g. an unreadable file)
    Error,
}

/// A user-facing notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMessage {
    /// Message severity
    pub level: MessageLevel,
    /// Human-readable text, shown verbatim
    pub text: String,
}

/// Queue of user-facing messages, drained by the hosting application
#[derive(Debug, Clone, Default)]
pub struct MessageQueue {
    inner: Arc<Mutex<VecDeque<UserMessage>>>,
}

impl MessageQueue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a message for the user
    pub fn push(&self, level: MessageLevel, text: impl Into<String>) {
        let message = UserMessage {
            level,
            text: text.into(),
        };
        debug!(level = ?message.level, text = %message.text, "user message queued");
        self.inner.lock().push_back(message);
    }

    /// Take all queued messages, oldest first
    pub fn drain(&self) -> Vec<UserMessage> {
        self.inner.lock().drain(..).collect()
    }

    /// Number of queued messages
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// Queue of outbound command strings, drained by the connection owner
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    inner: Arc<Mutex<VecDeque<String>>>,
}

impl CommandQueue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a ready-to-send command string
    pub fn push(&self, command: impl Into<String>) {
        let command = command.into();
        debug!(command = %command, "outbound command queued");
        self.inner.lock().push_back(command);
    }

    /// Take all queued commands, oldest first
    pub fn drain(&self) -> Vec<String> {
        self.inner.lock().drain(..).collect()
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
