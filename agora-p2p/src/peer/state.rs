//! Peer handshake state.

use std::fmt;

/// Handshake progress for a peer URI.
///
/// There are no timeout-driven transitions: a peer that never completes its
/// handshake simply stays where it is. Transitions happen only when inbound
/// messages are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeerState {
    /// No table entry for this URI.
    #[default]
    Unknown,
    /// Table entry exists but no public key has been learned.
    KnownNoKey,
    /// Table entry exists and a public key is known; sends are sealed.
    KnownWithKey,
}

impl PeerState {
    /// Check if the peer has a table entry.
    pub fn is_known(&self) -> bool {
        !matches!(self, PeerState::Unknown)
    }

    /// Check if the peer's public key is known.
    pub fn has_key(&self) -> bool {
        matches!(self, PeerState::KnownWithKey)
    }
}

impl fmt::Display for PeerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerState::Unknown => write!(f, "unknown"),
            PeerState::KnownNoKey => write!(f, "known_no_key"),
            PeerState::KnownWithKey => write!(f, "known_with_key"),
        }
    }
}
