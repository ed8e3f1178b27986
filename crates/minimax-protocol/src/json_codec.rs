//! JSON text <-> session messages.

use thiserror::Error;

use minimax_core::RequestError;

use crate::messages::{InboundMessage, OutboundEvent, SessionCommand};

/// Why an inbound text frame did not become a command.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Not JSON, unknown `type`, or missing/mistyped fields.
    #[error("invalid message: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Well-formed message carrying an invalid board or depth limit.
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Parse and validate one inbound text frame.
pub fn decode_inbound(text: &str) -> Result<SessionCommand, ProtocolError> {
    let msg: InboundMessage = serde_json::from_str(text)?;
    Ok(SessionCommand::try_from(msg)?)
}

/// Render an outbound event as one text frame.
pub fn encode_event(event: &OutboundEvent) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(event)?)
}
