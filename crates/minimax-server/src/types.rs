//! Shared types for the analysis server.
//!
//! This module defines:
//! - `SessionId` / `TaskId`: lightweight handles for logging and tracking
//! - channel aliases carrying lifecycle events back to a session

use std::fmt;

use minimax_protocol::OutboundEvent;
use tokio::sync::mpsc;

/// Identifier for an open session (one WebSocket connection or one
/// HTTP analysis request).
///
/// Unique over the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

/// Identifier for a submitted task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle events from the scheduler to a session's writer.
pub type EventTx = mpsc::UnboundedSender<OutboundEvent>;
pub type EventRx = mpsc::UnboundedReceiver<OutboundEvent>;
