//! Error types for the Agora core crate.

use std::fmt;

/// Errors related to cryptographic operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CryptoError {
    /// The public key is malformed or not a valid compressed curve point.
    InvalidPublicKey,
    /// The secret key is malformed or out of range for the curve.
    InvalidSecretKey,
    /// The signature bytes are malformed.
    InvalidSignature,
    /// Signature verification failed (signature doesn't match digest/key).
    SignatureVerificationFailed,
    /// Signing failed.
    SigningFailed,
    /// Sealing a payload failed.
    EncryptionFailed,
    /// Opening a sealed payload failed (wrong key or corrupted data).
    DecryptionFailed,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::InvalidPublicKey => write!(f, "invalid public key format"),
            CryptoError::InvalidSecretKey => write!(f, "invalid secret key format"),
            CryptoError::InvalidSignature => write!(f, "invalid signature format"),
            CryptoError::SignatureVerificationFailed => write!(f, "signature verification failed"),
            CryptoError::SigningFailed => write!(f, "signing failed"),
            CryptoError::EncryptionFailed => write!(f, "sealing failed"),
            CryptoError::DecryptionFailed => {
                write!(f, "opening failed (wrong key or corrupted data)")
            }
        }
    }
}

impl std::error::Error for CryptoError {}

/// Errors raised when the identity keystore is missing or malformed.
///
/// These are the only errors in the system that are fatal: a node cannot
/// participate in the network without validated key material.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentityError {
    /// The keystore file could not be read.
    Unreadable(String),
    /// The keystore is not the expected JSON shape.
    Malformed(String),
    /// The secret key hex string has the wrong length.
    BadSecretLength {
        /// Expected length in hex characters.
        expected: usize,
        /// Actual length in hex characters.
        actual: usize,
    },
    /// The public key hex string has the wrong length.
    BadPublicKeyLength {
        /// Expected length in hex characters.
        expected: usize,
        /// Actual length in hex characters.
        actual: usize,
    },
    /// A key field is not valid hex.
    InvalidHex(String),
    /// The decoded key material is not valid for the curve.
    BadKeyMaterial(CryptoError),
    /// The stored public key does not match the one derived from the secret.
    KeyMismatch,
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::Unreadable(msg) => write!(f, "keystore unreadable: {}", msg),
            IdentityError::Malformed(msg) => write!(f, "malformed identity store: {}", msg),
            IdentityError::BadSecretLength { expected, actual } => {
                write!(f, "secret key must be {} hex chars, got {}", expected, actual)
            }
            IdentityError::BadPublicKeyLength { expected, actual } => {
                write!(f, "public key must be {} hex chars, got {}", expected, actual)
            }
            IdentityError::InvalidHex(field) => write!(f, "{} is not valid hex", field),
            IdentityError::BadKeyMaterial(e) => write!(f, "bad key material: {}", e),
            IdentityError::KeyMismatch => {
                write!(f, "stored public key does not match the secret key")
            }
        }
    }
}

impl std::error::Error for IdentityError {}

impl From<CryptoError> for IdentityError {
    fn from(e: CryptoError) -> Self {
        IdentityError::BadKeyMaterial(e)
    }
}
