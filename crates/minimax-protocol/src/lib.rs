//! minimax-protocol
//!
//! Wire formats for the analysis service.
//!
//! This crate turns logical core values (`minimax_core::AnalysisRequest` /
//! `AnalysisResult`) into text and back again.
//!
//! - [`messages`]    : session message types (inbound commands, outbound events)
//! - [`json_codec`]  : JSON text frames for WebSocket sessions
//! - [`worker_wire`] : job / report pair for worker processes

pub mod messages;
pub mod json_codec;
pub mod worker_wire;

pub use messages::{AnalysisOptions, InboundMessage, OutboundEvent, SessionCommand};

pub use json_codec::{decode_inbound, encode_event, ProtocolError};

pub use worker_wire::{
    decode_job,
    decode_report,
    encode_job,
    encode_report,
    WorkerJob,
    WorkerReport,
};
