//! The hello handshake and pubkey challenge-response.
//!
//! Handshake rules, applied per inbound message:
//!
//! - A typeless profile announcement from an unknown peer gets a
//!   `hello_request`.
//! - A `hello_request` gets a `hello_response`.
//! - A `hello_response` terminates the exchange; no reply.
//!
//! Keys carried in handshake messages are adopted last-write-wins with no
//! verification. A peer that wants proof of a key asks for it through the
//! signed pubkey challenge-response instead.

use agora_core::{hash256, sign_digest, PublicKey};

use crate::error::P2pResult;
use crate::node::Node;
use crate::protocol::{Envelope, HELLO_REQUEST, HELLO_RESPONSE};
use crate::uri::is_valid_peer_uri;

impl Node {
    /// Apply one handshake message to the peer table and reply as the
    /// exchange requires. All failures are contained and logged.
    pub(crate) fn init_peer(&mut self, envelope: &Envelope) {
        let Some(uri) = envelope.uri.clone() else {
            return;
        };
        if !is_valid_peer_uri(&uri) {
            tracing::warn!(uri = %uri, "dropping handshake message with invalid peer uri");
            return;
        }
        if uri == self.table().local_uri() {
            tracing::debug!("ignoring handshake message claiming our own uri");
            return;
        }

        let supplied_key = parse_announced_key(&uri, envelope.pubkey.as_deref());
        let known = self.table().contains(&uri);

        if known {
            if let Some(key) = supplied_key {
                if let Some(conn) = self.table_mut().get_mut(&uri) {
                    conn.set_pubkey(key);
                }
            }
            // A known peer only ever needs one thing from us: an answer
            // to its hello_request.
            if envelope.msg_type.as_deref() == Some(HELLO_REQUEST) {
                self.reply(&uri, Envelope::hello_response(self.profile()));
            }
            return;
        }

        tracing::info!(uri = %uri, msg = %envelope.type_name(), "new peer");
        self.table_mut().create_peer(&uri, supplied_key);

        match envelope.msg_type.as_deref() {
            None => self.reply(&uri, Envelope::hello_request(self.profile())),
            Some(HELLO_REQUEST) => self.reply(&uri, Envelope::hello_response(self.profile())),
            Some(HELLO_RESPONSE) => {}
            Some(other) => {
                tracing::debug!(uri = %uri, msg = %other, "no reply for handshake type");
            }
        }
    }

    /// Admit every gossiped peer from the message's `peers` vector.
    ///
    /// Second-hand peers are recorded silently, never greeted; we talk to
    /// them when traffic actually flows. The local URI is skipped.
    pub(crate) fn expand_gossip(&mut self, envelope: &Envelope) {
        for (uri, key_hex) in &envelope.peers {
            if uri == self.table().local_uri() {
                continue;
            }
            if !is_valid_peer_uri(uri) {
                tracing::debug!(uri = %uri, "skipping gossiped peer with invalid uri");
                continue;
            }
            let key = parse_announced_key(uri, Some(key_hex));

            if self.table().contains(uri) {
                if let Some(key) = key {
                    if let Some(conn) = self.table_mut().get_mut(uri) {
                        conn.set_pubkey(key);
                    }
                }
            } else {
                tracing::info!(uri = %uri, "admitting gossiped peer");
                self.table_mut().create_peer(uri, key);
            }
        }
    }

    /// Answer a pubkey challenge for `claimed`, proving control of the
    /// local key.
    ///
    /// Fail-closed: when the claimed key is not ours the challenge is
    /// logged and silently ignored. Otherwise the reply carries a
    /// signature over `hash256(pubkey)` that the requester verifies
    /// against the claimed key.
    pub fn respond_pubkey_challenge(
        &self,
        requester_uri: &str,
        nickname: &str,
        claimed: &str,
    ) -> P2pResult<()> {
        let local_pub = self.identity().public_key();
        if claimed != local_pub.to_hex() {
            tracing::warn!(
                requester = %requester_uri,
                nickname = %nickname,
                "pubkey challenge for a key that is not ours, ignoring"
            );
            return Ok(());
        }

        let digest = hash256(&local_pub.to_bytes());
        let signature = sign_digest(self.identity().keypair(), &digest)?;
        let reply = Envelope::pubkey_response(nickname, &local_pub, &signature);

        tracing::info!(requester = %requester_uri, "answering pubkey challenge");
        self.send_to(requester_uri, &reply)
    }

    fn reply(&self, uri: &str, envelope: Envelope) {
        if let Err(e) = self.send_to(uri, &envelope) {
            tracing::warn!(uri = %uri, error = %e, "failed to send handshake reply");
        }
    }
}

/// Parse a hex-announced key, treating malformed material as absent.
fn parse_announced_key(uri: &str, hex_key: Option<&str>) -> Option<PublicKey> {
    let hex_key = hex_key?;
    match PublicKey::from_hex(hex_key) {
        Ok(key) => Some(key),
        Err(e) => {
            tracing::warn!(uri = %uri, error = %e, "ignoring malformed announced public key");
            None
        }
    }
}
