//! Inbound message decoding.
//!
//! Wire traffic arrives either as cleartext JSON or as a sealed blob
//! addressed to the local key. Decoding tries cleartext first, then
//! decryption, and classifies anything else as unreadable rather than
//! failing: a message that cannot be decoded is the sender's problem,
//! not ours.

use agora_core::{open, KeyPair};

use crate::protocol::Envelope;

/// Outcome of decoding one raw inbound payload.
#[derive(Debug)]
pub enum Decoded {
    /// Parsed directly from cleartext JSON.
    Plain(Envelope),
    /// Decrypted with the local key, then parsed.
    Encrypted(Envelope),
    /// Neither cleartext nor addressed to us; dropped.
    Unreadable,
}

impl Decoded {
    /// The envelope, regardless of how it arrived.
    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            Decoded::Plain(env) | Decoded::Encrypted(env) => Some(env),
            Decoded::Unreadable => None,
        }
    }
}

/// Decode a raw inbound payload, trying cleartext before decryption.
pub fn decode(raw: &[u8], local_key: &KeyPair) -> Decoded {
    match Envelope::from_slice(raw) {
        Ok(env) => return Decoded::Plain(env),
        Err(e) => {
            tracing::trace!(error = %e, "payload is not cleartext JSON, trying decryption");
        }
    }

    let plaintext = match open(raw, local_key) {
        Ok(pt) => pt,
        Err(e) => {
            tracing::debug!(error = %e, len = raw.len(), "payload did not decrypt with local key");
            return Decoded::Unreadable;
        }
    };

    match Envelope::from_slice(&plaintext) {
        Ok(env) => Decoded::Encrypted(env),
        Err(e) => {
            tracing::debug!(error = %e, "decrypted payload is not valid JSON");
            Decoded::Unreadable
        }
    }
}
