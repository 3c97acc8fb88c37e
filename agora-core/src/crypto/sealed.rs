//! Sealed-box asymmetric encryption.
//!
//! Seals a payload to a recipient public key so that only the holder of the
//! matching secret key can open it. Used to opportunistically encrypt wire
//! messages once a peer's public key is known.
//!
//! # Wire Layout
//!
//! | Field          | Size (bytes) | Description                          |
//! |----------------|--------------|--------------------------------------|
//! | Ephemeral key  | 33           | Compressed SEC1 point                |
//! | Nonce          | 12           | Random nonce for AES-256-GCM         |
//! | Ciphertext     | len + 16     | Payload + GCM tag                    |
//!
//! The AEAD key is the SHA-256 digest of the raw ECDH shared secret between
//! the ephemeral key and the recipient key. A fresh ephemeral key and nonce
//! are drawn per message.

use aes_gcm::{aead::Aead, Aes256Gcm, KeyInit, Nonce};
use k256::ecdh::{diffie_hellman, EphemeralSecret};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::keys::{KeyPair, PublicKey, PUBLIC_KEY_SIZE};
use crate::error::CryptoError;

/// Nonce size in bytes (for AES-GCM).
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Smallest possible sealed payload (empty plaintext).
pub const MIN_SEALED_SIZE: usize = PUBLIC_KEY_SIZE + NONCE_SIZE + TAG_SIZE;

/// Seal `plaintext` to a recipient public key.
pub fn seal(plaintext: &[u8], recipient: &PublicKey) -> Result<Vec<u8>, CryptoError> {
    let ephemeral = EphemeralSecret::random(&mut OsRng);
    let ephemeral_pub = ephemeral.public_key();
    let shared = ephemeral.diffie_hellman(recipient.inner());
    let key = Sha256::digest(shared.raw_secret_bytes());

    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| CryptoError::EncryptionFailed)?;
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let mut out = Vec::with_capacity(MIN_SEALED_SIZE + plaintext.len());
    out.extend_from_slice(ephemeral_pub.to_encoded_point(true).as_bytes());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Open a sealed payload with the local secret key.
///
/// Any structural or authentication failure collapses to
/// [`CryptoError::DecryptionFailed`]; callers treat sealed payloads as
/// all-or-nothing.
pub fn open(sealed: &[u8], keypair: &KeyPair) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < MIN_SEALED_SIZE {
        return Err(CryptoError::DecryptionFailed);
    }

    let ephemeral_pub = k256::PublicKey::from_sec1_bytes(&sealed[..PUBLIC_KEY_SIZE])
        .map_err(|_| CryptoError::DecryptionFailed)?;
    let nonce_bytes = &sealed[PUBLIC_KEY_SIZE..PUBLIC_KEY_SIZE + NONCE_SIZE];
    let ciphertext = &sealed[PUBLIC_KEY_SIZE + NONCE_SIZE..];

    let shared = diffie_hellman(keypair.secret().to_nonzero_scalar(), ephemeral_pub.as_affine());
    let key = Sha256::digest(shared.raw_secret_bytes());

    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| CryptoError::DecryptionFailed)?;
    let nonce = Nonce::from_slice(nonce_bytes);
    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)
}
