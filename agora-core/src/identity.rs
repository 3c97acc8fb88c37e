//! Local node identity and keystore loading.
//!
//! The keystore is a small JSON file:
//!
//! ```json
//! {"nickname": "ava", "secret": "<64 hex chars>", "pubkey": "<66 hex chars>"}
//! ```
//!
//! Validation is strict and fails closed: field presence, hex decoding,
//! byte lengths (32-byte secret, 33-byte compressed public key), and
//! agreement between the stored public key and the one derived from the
//! secret. A node with a malformed identity never touches the network.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::{KeyPair, PublicKey, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE};
use crate::error::IdentityError;

/// Expected hex length of the stored secret key.
pub const SECRET_HEX_LEN: usize = 2 * SECRET_KEY_SIZE;

/// Expected hex length of the stored public key.
pub const PUBKEY_HEX_LEN: usize = 2 * PUBLIC_KEY_SIZE;

/// On-disk identity store record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityStore {
    /// Human-readable node nickname.
    pub nickname: String,
    /// Hex-encoded 32-byte secret key.
    pub secret: String,
    /// Hex-encoded 33-byte compressed public key.
    pub pubkey: String,
}

/// The local node's validated identity.
///
/// Immutable for the process lifetime; created once at startup.
#[derive(Clone)]
pub struct Identity {
    nickname: String,
    keypair: KeyPair,
}

impl Identity {
    /// Load and validate an identity from a keystore file.
    pub fn load(path: &Path) -> Result<Self, IdentityError> {
        let data =
            fs::read_to_string(path).map_err(|e| IdentityError::Unreadable(e.to_string()))?;
        let store: IdentityStore =
            serde_json::from_str(&data).map_err(|e| IdentityError::Malformed(e.to_string()))?;
        Self::from_store(store)
    }

    /// Validate a parsed keystore record.
    pub fn from_store(store: IdentityStore) -> Result<Self, IdentityError> {
        if store.secret.len() != SECRET_HEX_LEN {
            return Err(IdentityError::BadSecretLength {
                expected: SECRET_HEX_LEN,
                actual: store.secret.len(),
            });
        }
        if store.pubkey.len() != PUBKEY_HEX_LEN {
            return Err(IdentityError::BadPublicKeyLength {
                expected: PUBKEY_HEX_LEN,
                actual: store.pubkey.len(),
            });
        }

        let secret_bytes = hex::decode(&store.secret)
            .map_err(|_| IdentityError::InvalidHex("secret".to_string()))?;
        let keypair = KeyPair::from_secret_bytes(&secret_bytes)?;

        let declared = PublicKey::from_hex(&store.pubkey)
            .map_err(|_| IdentityError::InvalidHex("pubkey".to_string()))?;
        if keypair.public_key() != declared {
            return Err(IdentityError::KeyMismatch);
        }

        Ok(Identity {
            nickname: store.nickname,
            keypair,
        })
    }

    /// Generate a fresh identity with a random key pair.
    pub fn generate(nickname: impl Into<String>) -> Self {
        Identity {
            nickname: nickname.into(),
            keypair: KeyPair::generate(),
        }
    }

    /// Produce the keystore record for this identity.
    pub fn to_store(&self) -> IdentityStore {
        IdentityStore {
            nickname: self.nickname.clone(),
            secret: hex::encode(self.keypair.secret_bytes()),
            pubkey: self.keypair.public_key().to_hex(),
        }
    }

    /// The node's nickname.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// The node's key pair.
    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    /// The node's public key.
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }
}
