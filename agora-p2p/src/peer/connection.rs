//! Per-peer send path and encryption.

use std::fmt;
use std::sync::Arc;

use agora_core::{seal, PublicKey};

use crate::error::{P2pError, P2pResult};
use crate::peer::state::PeerState;
use crate::protocol::Envelope;
use crate::transport::{MessageHook, Transport};

/// One entry in the peer table: a remote peer, its optionally-known public
/// key, and the per-peer send path.
///
/// The connection seals outbound messages when the peer's key is known and
/// falls back to a clearly-logged cleartext send when it is not. Actual
/// byte transmission is delegated to the external transport.
pub struct PeerConnection {
    uri: String,
    pubkey: Option<PublicKey>,
    hook: Option<Arc<dyn MessageHook>>,
}

impl PeerConnection {
    /// Create a connection entry, with the peer's public key if known.
    pub fn new(uri: impl Into<String>, pubkey: Option<PublicKey>) -> Self {
        Self {
            uri: uri.into(),
            pubkey,
            hook: None,
        }
    }

    /// The peer's URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The peer's public key, if learned.
    pub fn pubkey(&self) -> Option<&PublicKey> {
        self.pubkey.as_ref()
    }

    /// The peer's handshake state.
    pub fn state(&self) -> PeerState {
        if self.pubkey.is_some() {
            PeerState::KnownWithKey
        } else {
            PeerState::KnownNoKey
        }
    }

    /// Adopt or overwrite the peer's public key (last-write-wins).
    ///
    /// No verification happens here; a peer that wants proof of a claimed
    /// key asks for it explicitly via the pubkey challenge-response.
    pub fn set_pubkey(&mut self, key: PublicKey) {
        match &self.pubkey {
            None => tracing::info!(uri = %self.uri, key = %key, "learned public key for peer"),
            Some(old) if *old != key => {
                tracing::info!(uri = %self.uri, key = %key, "updating public key for peer");
            }
            _ => {}
        }
        self.pubkey = Some(key);
    }

    /// Install an application hook overriding the node-wide default.
    pub fn set_hook(&mut self, hook: Arc<dyn MessageHook>) {
        self.hook = Some(hook);
    }

    /// Seal `plaintext` to this peer's public key.
    ///
    /// Fails with [`P2pError::EncryptionUnavailable`] when the key is not
    /// yet known; callers that can tolerate cleartext use [`Self::send`]
    /// instead, which checks first.
    pub fn encrypt(&self, plaintext: &[u8]) -> P2pResult<Vec<u8>> {
        let key = self
            .pubkey
            .as_ref()
            .ok_or_else(|| P2pError::EncryptionUnavailable(self.uri.clone()))?;
        Ok(seal(plaintext, key)?)
    }

    /// Serialize and transmit a message to this peer.
    ///
    /// Sealed when the peer's key is known; otherwise sent in cleartext
    /// with an explicit log marker. Fire-and-forget either way.
    pub fn send(&self, envelope: &Envelope, transport: &dyn Transport) -> P2pResult<()> {
        let bytes = envelope
            .to_bytes()
            .map_err(|e| P2pError::Encode(e.to_string()))?;

        match &self.pubkey {
            Some(key) => {
                tracing::info!(uri = %self.uri, msg = %envelope.type_name(), "sending sealed message");
                let sealed = seal(&bytes, key)?;
                transport.send_raw(&self.uri, &sealed)
            }
            None => {
                tracing::warn!(uri = %self.uri, msg = %envelope.type_name(), "no public key known, sending in cleartext");
                transport.send_raw(&self.uri, &bytes)
            }
        }
    }

    /// Deliver a non-handshake message to this connection's hook, or to the
    /// node-wide fallback when none is installed.
    pub fn deliver(&self, from: &str, message: &Envelope, fallback: &Arc<dyn MessageHook>) {
        match &self.hook {
            Some(hook) => hook.on_message(from, message),
            None => fallback.on_message(from, message),
        }
    }
}

// Manual Debug: the hook trait object has no Debug of its own.
impl fmt::Debug for PeerConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerConnection")
            .field("uri", &self.uri)
            .field("state", &self.state())
            .finish()
    }
}
