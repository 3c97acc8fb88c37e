//! P2P error types.

use agora_core::{CryptoError, IdentityError};
use thiserror::Error;

/// P2P-specific errors.
///
/// Per-message failures (undecodable payloads, invalid peer URIs on inbound
/// traffic) are contained to that message inside the dispatch path and never
/// surface here; these variants cover the caller-facing operations.
#[derive(Debug, Error)]
pub enum P2pError {
    /// A peer URI failed the syntactic validity check.
    #[error("invalid peer uri: {0}")]
    InvalidPeerUri(String),

    /// No public key is known for the peer, so sealing is impossible.
    /// Resolved by the cleartext fallback in the send path, not by retrying.
    #[error("no public key known for {0}: encryption unavailable")]
    EncryptionUnavailable(String),

    /// The peer is not in the table.
    #[error("peer not found: {0}")]
    PeerNotFound(String),

    /// Failed to serialize an outbound message.
    #[error("encode error: {0}")]
    Encode(String),

    /// The transport rejected an outbound send.
    #[error("transport error: {0}")]
    Transport(String),

    /// Cryptographic operation failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// The identity keystore is missing or malformed (fatal at startup).
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),
}

/// Result type for P2P operations.
pub type P2pResult<T> = Result<T, P2pError>;
