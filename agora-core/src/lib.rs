//! # Agora Core
//!
//! Key material and cryptography for the Agora peer protocol.
//!
//! This crate provides the foundation the networking layer builds on:
//! - secp256k1 key pairs (32-byte secrets, 33-byte compressed public keys)
//! - ECDSA signing and verification over a double-SHA-256 domain digest
//! - Sealed-box asymmetric encryption for opportunistic payload sealing
//! - Identity loading and validation from a JSON keystore

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod crypto;
pub mod error;
pub mod identity;

// Re-export commonly used types at crate root
pub use crypto::{
    hash256, open, seal, sign_digest, verify_digest, KeyPair, PublicKey, Signature,
};
pub use error::{CryptoError, IdentityError};
pub use identity::{Identity, IdentityStore};
