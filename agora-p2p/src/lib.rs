//! Encrypted peer handshake and peer table for the Agora protocol.
//!
//! This crate implements the peer-facing half of an Agora node:
//!
//! - Peer discovery via the hello handshake and gossip propagation
//! - A peer table mapping URIs to connections with optionally-known keys
//! - Opportunistic payload sealing once a peer's public key is learned
//! - Signed pubkey challenge-response identity proofs
//!
//! # Architecture
//!
//! The protocol core runs as a single logical actor: the external transport
//! delivers one raw message at a time into [`Node::on_raw_message`] (or the
//! [`Node::run`] dispatch loop), and every operation in here is synchronous
//! and bounded-latency. Raw socket I/O lives behind the [`Transport`] trait;
//! this crate never opens a socket itself.
//!
//! ```text
//! raw bytes -> router::decode (plain | sealed | unreadable)
//!           -> hello-typed?  -> handshake (mutates the peer table, replies)
//!           -> otherwise     -> per-peer application hook
//! ```

pub mod config;
pub mod error;

pub mod node;
pub mod peer;
pub mod protocol;
pub mod router;
pub mod transport;
pub mod uri;

mod handshake;

// Re-export main types
pub use config::NodeConfig;
pub use error::{P2pError, P2pResult};
pub use node::{Node, RawMessage};
pub use peer::{PeerConnection, PeerState, PeerTable};
pub use protocol::{Envelope, Profile};
pub use router::{decode, Decoded};
pub use transport::{MessageHook, NoopHook, Transport};
pub use uri::is_valid_peer_uri;
