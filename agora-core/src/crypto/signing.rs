//! ECDSA signature creation and verification.
//!
//! Signing here is always over a precomputed 32-byte digest (see
//! [`crate::crypto::hash256`]); callers pick the domain digest, this module
//! only does the curve math.

use std::fmt;

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{SigningKey, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::keys::{KeyPair, PublicKey};
use crate::error::CryptoError;

/// Compact signature size in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// Compact ECDSA signature wrapper with hex serialization.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(k256::ecdsa::Signature);

impl Signature {
    /// Create a Signature from compact 64-byte form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        k256::ecdsa::Signature::from_slice(bytes)
            .map(Signature)
            .map_err(|_| CryptoError::InvalidSignature)
    }

    /// Decode a Signature from its hex wire form.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|_| CryptoError::InvalidSignature)?;
        Self::from_bytes(&bytes)
    }

    /// Get the compact 64-byte form of the signature.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let bytes = self.0.to_bytes();
        let mut out = [0u8; SIGNATURE_SIZE];
        out.copy_from_slice(&bytes);
        out
    }

    /// Hex-encode the signature for the wire.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signature").field(&self.to_hex()).finish()
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Signature::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Sign a 32-byte digest with the key pair's secret key.
pub fn sign_digest(keypair: &KeyPair, digest: &[u8; 32]) -> Result<Signature, CryptoError> {
    let signing_key = SigningKey::from(keypair.secret());
    signing_key
        .sign_prehash(digest)
        .map(Signature)
        .map_err(|_| CryptoError::SigningFailed)
}

/// Verify a signature over a 32-byte digest against a public key.
///
/// Returns Ok(()) if the signature is valid, or an error if verification fails.
pub fn verify_digest(
    public_key: &PublicKey,
    digest: &[u8; 32],
    signature: &Signature,
) -> Result<(), CryptoError> {
    VerifyingKey::from(public_key.inner())
        .verify_prehash(digest, &signature.0)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}
