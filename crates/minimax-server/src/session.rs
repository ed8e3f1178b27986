//! One client's session: decode commands, keep at most one task in flight.

use std::sync::Arc;

use tracing::{info, warn};

use minimax_protocol::{decode_inbound, OutboundEvent, SessionCommand};

use crate::scheduler::{Scheduler, SessionTicket, TaskHandle};
use crate::types::{EventTx, SessionId};

/// An open session. Holds a session slot until closed or dropped.
pub struct Session {
    ticket: SessionTicket,
    scheduler: Arc<Scheduler>,
    events: EventTx,
    current: Option<TaskHandle>,
}

impl Session {
    /// Open a session, or `None` if the session limit is reached.
    pub fn open(scheduler: &Arc<Scheduler>, events: EventTx) -> Option<Self> {
        let ticket = scheduler.open_session()?;
        info!(session = %ticket.id(), "Session opened");
        Some(Session {
            ticket,
            scheduler: Arc::clone(scheduler),
            events,
            current: None,
        })
    }

    pub fn id(&self) -> SessionId {
        self.ticket.id()
    }

    /// Handle one inbound text frame. Invalid frames become an error
    /// event and leave the current task alone.
    pub async fn handle_text(&mut self, text: &str) {
        match decode_inbound(text) {
            Ok(command) => self.handle_command(command).await,
            Err(e) => {
                warn!(session = %self.id(), "Rejected message: {}", e);
                let _ = self.events.send(OutboundEvent::error(e.to_string()));
            }
        }
    }

    pub async fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Analyze(request) => {
                // The old task must be gone before the new one asks for a slot.
                self.cancel_current().await;
                let handle = self.scheduler.submit(self.id(), request, self.events.clone());
                self.current = Some(handle);
            }
            SessionCommand::Cancel => self.cancel_current().await,
        }
    }

    async fn cancel_current(&mut self) {
        if let Some(task) = self.current.take() {
            let id = task.id();
            let outcome = task.cancel_and_wait().await;
            info!(session = %self.id(), task = %id, "Previous task ended: {:?}", outcome);
        }
    }

    /// Cancel any task and give the session slot back.
    pub async fn close(mut self) {
        self.cancel_current().await;
        info!(session = %self.id(), "Session closed");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(task) = &self.current {
            task.cancel();
        }
    }
}
