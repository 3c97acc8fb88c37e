//! External collaborator seams.
//!
//! The protocol core never performs socket I/O: outbound bytes go through
//! the [`Transport`] trait, and the surrounding system feeds inbound bytes
//! into [`crate::Node::on_raw_message`]. Sends are fire-and-forget; a
//! transport failure is logged by the caller and the message is not retried.

use crate::error::P2pResult;
use crate::protocol::Envelope;

/// Raw byte transmission to a peer URI.
pub trait Transport: Send + Sync {
    /// Transmit `bytes` to the peer addressed by `uri`.
    fn send_raw(&self, uri: &str, bytes: &[u8]) -> P2pResult<()>;
}

/// Application hook for non-handshake messages.
///
/// The default implementation ignores the message; most non-handshake
/// traffic at this layer is acknowledgment-only. Hooks may be installed
/// node-wide or overridden per peer connection.
pub trait MessageHook: Send + Sync {
    /// Called with every decoded non-handshake message.
    fn on_message(&self, from: &str, message: &Envelope) {
        tracing::trace!(from = %from, msg = %message.type_name(), "ignoring message");
    }
}

/// The default do-nothing message hook.
pub struct NoopHook;

impl MessageHook for NoopHook {}
