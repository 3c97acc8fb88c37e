//! Domain digest function.

use sha2::{Digest, Sha256};

/// Compute the double-SHA-256 digest of `data`.
///
/// This is the domain digest signed in the pubkey challenge-response
/// exchange: a peer proves control of an announced key by signing
/// `hash256(public_key_bytes)`.
pub fn hash256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}
