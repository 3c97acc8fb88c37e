//! Cryptographic primitives for the Agora protocol.
//!
//! Everything here is secp256k1: 32-byte secret scalars, 33-byte
//! SEC1-compressed public keys, compact 64-byte ECDSA signatures. Sealed
//! boxes combine an ephemeral ECDH exchange with AES-256-GCM.

pub mod hashing;
pub mod keys;
pub mod sealed;
pub mod signing;

pub use hashing::hash256;
pub use keys::{KeyPair, PublicKey, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE};
pub use sealed::{open, seal};
pub use signing::{sign_digest, verify_digest, Signature, SIGNATURE_SIZE};
