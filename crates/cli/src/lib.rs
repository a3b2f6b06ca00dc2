//! qBraid chat front-end.
//!
//! Command implementations and the chat panel protocol used by the
//! `qbraid-chat` binary.

pub mod commands;
pub mod handlers;
pub mod messages;
pub mod progress;

pub use handlers::{ChatHandler, FAILURE_REPLY};
pub use messages::{
    is_inbound_message, is_outbound_message, InboundMessage, InboundMessageType, OutboundMessage,
    OutboundMessageType,
};
