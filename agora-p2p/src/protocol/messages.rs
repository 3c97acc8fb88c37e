//! Protocol message envelope and constructors.
//!
//! Every wire payload is a JSON object. Handshake messages carry a `type`
//! string (`hello_request`, `hello_response`, `pubkey_response`); the very
//! first contact message carries no `type` at all and is implicitly a
//! profile announcement. Application messages use their own `type` values
//! and pass through this layer untouched.

use std::collections::BTreeMap;

use agora_core::{PublicKey, Signature};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Handshake greeting sent to a newly-learned peer.
pub const HELLO_REQUEST: &str = "hello_request";

/// Handshake reply; terminates the hello exchange.
pub const HELLO_RESPONSE: &str = "hello_response";

/// Signed proof of control over an announced public key.
pub const PUBKEY_RESPONSE: &str = "pubkey_response";

/// The local node's announcement payload.
///
/// Doubles as the gossip vector: `peers` maps every known peer URI to its
/// hex-encoded public key, spreading peer knowledge transitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The announcing node's URI.
    pub uri: String,
    /// The announcing node's public key, hex-encoded.
    #[serde(rename = "pub")]
    pub pubkey: String,
    /// Known peers with known public keys.
    #[serde(default)]
    pub peers: BTreeMap<String, String>,
}

/// A decoded wire message.
///
/// All fields the handshake cares about are optional: inbound traffic is
/// only loosely structured and missing fields are normal, not errors.
/// Fields outside the handshake vocabulary are preserved in `extra` so
/// application payloads survive routing untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message type; absent on a first-contact profile announcement.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub msg_type: Option<String>,

    /// The sender's peer URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// The sender's public key, hex-encoded.
    #[serde(rename = "pub", default, skip_serializing_if = "Option::is_none")]
    pub pubkey: Option<String>,

    /// Gossip vector: third-party peer URIs mapped to hex public keys.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub peers: BTreeMap<String, String>,

    /// Any remaining message fields (application payloads).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    /// Decode an envelope from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Serialize the envelope to its canonical wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Whether this message belongs to the handshake path.
    ///
    /// True for hello-typed messages and for typeless first contacts; both
    /// require a sender URI to act on.
    pub fn is_handshake(&self) -> bool {
        self.uri.is_some()
            && self
                .msg_type
                .as_deref()
                .map_or(true, |t| t.starts_with("hello"))
    }

    /// The message type for logging; typeless first contacts read "profile".
    pub fn type_name(&self) -> &str {
        self.msg_type.as_deref().unwrap_or("profile")
    }

    /// Build a typeless first-contact announcement from a profile.
    pub fn first_contact(profile: Profile) -> Self {
        Self::from_profile(None, profile)
    }

    /// Build a `hello_request` from a profile.
    pub fn hello_request(profile: Profile) -> Self {
        Self::from_profile(Some(HELLO_REQUEST), profile)
    }

    /// Build a `hello_response` from a profile.
    pub fn hello_response(profile: Profile) -> Self {
        Self::from_profile(Some(HELLO_RESPONSE), profile)
    }

    /// Build a signed `pubkey_response` identity proof.
    pub fn pubkey_response(nickname: &str, pubkey: &PublicKey, signature: &Signature) -> Self {
        let mut extra = Map::new();
        extra.insert("nickname".to_string(), Value::String(nickname.to_string()));
        extra.insert("pubkey".to_string(), Value::String(pubkey.to_hex()));
        extra.insert("signature".to_string(), Value::String(signature.to_hex()));
        Envelope {
            msg_type: Some(PUBKEY_RESPONSE.to_string()),
            uri: None,
            pubkey: None,
            peers: BTreeMap::new(),
            extra,
        }
    }

    fn from_profile(msg_type: Option<&str>, profile: Profile) -> Self {
        Envelope {
            msg_type: msg_type.map(str::to_string),
            uri: Some(profile.uri),
            pubkey: Some(profile.pubkey),
            peers: profile.peers,
            extra: Map::new(),
        }
    }
}
