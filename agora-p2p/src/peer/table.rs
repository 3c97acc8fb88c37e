//! The authoritative registry of known peers.

use std::collections::HashMap;

use agora_core::PublicKey;

use crate::peer::connection::PeerConnection;
use crate::peer::state::PeerState;
use crate::protocol::Profile;

/// Mapping of peer URI to peer connection.
///
/// The table is the single admission point for new peers, and the one
/// invariant it enforces itself is that the local node's own URI is never
/// inserted. Entries are never removed; peers accumulate for the process
/// lifetime.
#[derive(Debug)]
pub struct PeerTable {
    local_uri: String,
    peers: HashMap<String, PeerConnection>,
}

impl PeerTable {
    /// Create an empty table for a node with the given local URI.
    pub fn new(local_uri: impl Into<String>) -> Self {
        Self {
            local_uri: local_uri.into(),
            peers: HashMap::new(),
        }
    }

    /// The local node's URI.
    pub fn local_uri(&self) -> &str {
        &self.local_uri
    }

    /// Admit a peer, overwriting any existing entry for the URI.
    ///
    /// Re-creation is deliberately not rejected: the handshake logic always
    /// re-checks key consistency on known peers, so overwriting is harmless
    /// and keeps admission simple. Returns `None` only when the URI is the
    /// local node's own.
    pub fn create_peer(
        &mut self,
        uri: &str,
        pubkey: Option<PublicKey>,
    ) -> Option<&mut PeerConnection> {
        if uri == self.local_uri {
            tracing::debug!(uri = %uri, "refusing to add self to peer table");
            return None;
        }
        self.peers
            .insert(uri.to_string(), PeerConnection::new(uri, pubkey));
        self.peers.get_mut(uri)
    }

    /// Look up a peer by URI.
    pub fn get(&self, uri: &str) -> Option<&PeerConnection> {
        self.peers.get(uri)
    }

    /// Look up a peer by URI, mutably.
    pub fn get_mut(&mut self, uri: &str) -> Option<&mut PeerConnection> {
        self.peers.get_mut(uri)
    }

    /// Check if a URI has a table entry.
    pub fn contains(&self, uri: &str) -> bool {
        self.peers.contains_key(uri)
    }

    /// The handshake state of a URI, `Unknown` when there is no entry.
    pub fn state_of(&self, uri: &str) -> PeerState {
        self.peers.get(uri).map_or(PeerState::Unknown, PeerConnection::state)
    }

    /// Check if any peer is already known under the given public key.
    pub fn pubkey_exists(&self, key: &PublicKey) -> bool {
        self.peers.values().any(|p| p.pubkey() == Some(key))
    }

    /// Build the local profile: uri, public key, and the gossip vector of
    /// every peer whose key is known.
    pub fn profile(&self, local_pub: &PublicKey) -> Profile {
        let peers = self
            .peers
            .iter()
            .filter_map(|(uri, conn)| conn.pubkey().map(|k| (uri.clone(), k.to_hex())))
            .collect();
        Profile {
            uri: self.local_uri.clone(),
            pubkey: local_pub.to_hex(),
            peers,
        }
    }

    /// Number of known peers.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Iterate over all peer connections.
    pub fn iter(&self) -> impl Iterator<Item = &PeerConnection> {
        self.peers.values()
    }
}
