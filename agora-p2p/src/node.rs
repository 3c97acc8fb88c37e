//! Main protocol node orchestrator.

use std::sync::Arc;

use agora_core::Identity;
use tokio::sync::mpsc;

use crate::config::NodeConfig;
use crate::error::{P2pError, P2pResult};
use crate::peer::PeerTable;
use crate::protocol::{Envelope, Profile};
use crate::router::{decode, Decoded};
use crate::transport::{MessageHook, NoopHook, Transport};
use crate::uri::is_valid_peer_uri;

/// One raw inbound payload, tagged with the transport-level sender URI.
#[derive(Debug)]
pub struct RawMessage {
    /// URI the transport attributes the payload to.
    pub from: String,
    /// The raw payload bytes, cleartext or sealed.
    pub bytes: Vec<u8>,
}

/// A protocol node: identity, peer table, and the dispatch logic tying
/// them together.
///
/// All state mutation happens through [`Node::on_raw_message`] and the
/// outbound calls, one message at a time. The table carries no lock; when
/// driven by [`Node::run`] the node is a single actor and nothing else
/// touches it.
pub struct Node {
    identity: Identity,
    config: NodeConfig,
    table: PeerTable,
    transport: Arc<dyn Transport>,
    hook: Arc<dyn MessageHook>,
}

impl Node {
    /// Create a node with the default do-nothing message hook.
    pub fn new(config: NodeConfig, identity: Identity, transport: Arc<dyn Transport>) -> Self {
        let table = PeerTable::new(config.uri.clone());
        Self {
            identity,
            config,
            table,
            transport,
            hook: Arc::new(NoopHook),
        }
    }

    /// Replace the node-wide hook for non-handshake messages.
    pub fn with_hook(mut self, hook: Arc<dyn MessageHook>) -> Self {
        self.hook = hook;
        self
    }

    /// The node's identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The peer table.
    pub fn table(&self) -> &PeerTable {
        &self.table
    }

    /// The peer table, mutably.
    pub fn table_mut(&mut self) -> &mut PeerTable {
        &mut self.table
    }

    /// The local profile announced in handshake messages.
    pub fn profile(&self) -> Profile {
        self.table.profile(&self.identity.public_key())
    }

    /// Send a message to a known peer, sealed when its key is known.
    pub fn send_to(&self, uri: &str, envelope: &Envelope) -> P2pResult<()> {
        let conn = self
            .table
            .get(uri)
            .ok_or_else(|| P2pError::PeerNotFound(uri.to_string()))?;
        conn.send(envelope, self.transport.as_ref())
    }

    /// Dial a peer: admit it to the table and send a first-contact profile.
    ///
    /// The greeting is typeless, so the remote side treats it as a profile
    /// announcement and answers with a `hello_request`.
    pub fn greet(&mut self, uri: &str) -> P2pResult<()> {
        if !is_valid_peer_uri(uri) || uri == self.config.uri {
            return Err(P2pError::InvalidPeerUri(uri.to_string()));
        }
        if !self.table.contains(uri) {
            self.table.create_peer(uri, None);
        }
        tracing::info!(uri = %uri, "greeting peer");
        self.send_to(uri, &Envelope::first_contact(self.profile()))
    }

    /// Greet every configured seed peer. Individual failures are logged
    /// and do not abort the rest of the list.
    pub fn bootstrap(&mut self) {
        let seeds = self.config.seed_peers.clone();
        for seed in seeds {
            if let Err(e) = self.greet(&seed) {
                tracing::warn!(uri = %seed, error = %e, "failed to greet seed peer");
            }
        }
    }

    /// Process one raw inbound payload.
    ///
    /// The single entry point for inbound traffic. Every per-message
    /// failure (undecodable bytes, invalid URIs, bad keys) is contained
    /// here; nothing a remote peer sends can surface an error.
    pub fn on_raw_message(&mut self, from: &str, bytes: &[u8]) {
        let envelope = match decode(bytes, self.identity.keypair()) {
            Decoded::Plain(env) => {
                tracing::debug!(from = %from, msg = %env.type_name(), "received cleartext message");
                env
            }
            Decoded::Encrypted(env) => {
                tracing::debug!(from = %from, msg = %env.type_name(), "received sealed message");
                env
            }
            Decoded::Unreadable => {
                tracing::debug!(from = %from, len = bytes.len(), "dropping unreadable payload");
                return;
            }
        };
        self.dispatch(from, &envelope);
    }

    fn dispatch(&mut self, from: &str, envelope: &Envelope) {
        if envelope.is_handshake() {
            self.init_peer(envelope);
            self.expand_gossip(envelope);
            tracing::info!(peers = self.table.len(), "peer table updated");
            return;
        }

        match self.table.get(from) {
            Some(conn) => conn.deliver(from, envelope, &self.hook),
            None => self.hook.on_message(from, envelope),
        }
    }

    /// Drive the node as a single actor: greet the seed peers, then
    /// process inbound messages one at a time until shutdown.
    pub async fn run(
        mut self,
        mut inbox: mpsc::UnboundedReceiver<RawMessage>,
        mut shutdown: mpsc::Receiver<()>,
    ) {
        tracing::info!(uri = %self.config.uri, "node started");
        self.bootstrap();

        loop {
            tokio::select! {
                maybe = inbox.recv() => match maybe {
                    Some(msg) => self.on_raw_message(&msg.from, &msg.bytes),
                    None => {
                        tracing::info!("inbox closed, stopping");
                        break;
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!("shutdown signal received");
                    break;
                }
            }
        }

        tracing::info!(peers = self.table.len(), "node stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::P2pResult;
    use crate::transport::Transport;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl Transport for RecordingTransport {
        fn send_raw(&self, uri: &str, bytes: &[u8]) -> P2pResult<()> {
            self.sent.lock().unwrap().push((uri.to_string(), bytes.to_vec()));
            Ok(())
        }
    }

    fn test_node(uri: &str, transport: Arc<RecordingTransport>) -> Node {
        let identity = Identity::generate("tester");
        Node::new(NodeConfig::new(uri), identity, transport)
    }

    const LOCAL: &str = "tcp://203.0.113.1:12345";
    const REMOTE: &str = "tcp://203.0.113.2:12345";

    #[test]
    fn test_greet_rejects_bad_and_self_uris() {
        let transport = Arc::new(RecordingTransport::default());
        let mut node = test_node(LOCAL, transport.clone());

        assert!(matches!(node.greet("not a uri"), Err(P2pError::InvalidPeerUri(_))));
        assert!(matches!(node.greet(LOCAL), Err(P2pError::InvalidPeerUri(_))));
        assert!(transport.sent.lock().unwrap().is_empty());
        assert!(node.table().is_empty());
    }

    #[test]
    fn test_greet_sends_typeless_profile() {
        let transport = Arc::new(RecordingTransport::default());
        let mut node = test_node(LOCAL, transport.clone());

        node.greet(REMOTE).unwrap();

        assert!(node.table().contains(REMOTE));
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, REMOTE);
        // First contact goes out in cleartext (no key yet) with no type.
        let env = Envelope::from_slice(&sent[0].1).unwrap();
        assert!(env.msg_type.is_none());
        assert_eq!(env.uri.as_deref(), Some(LOCAL));
        assert_eq!(
            env.pubkey.as_deref(),
            Some(node.identity().public_key().to_hex().as_str())
        );
    }

    #[test]
    fn test_bootstrap_survives_bad_seeds() {
        let transport = Arc::new(RecordingTransport::default());
        let identity = Identity::generate("tester");
        let config = NodeConfig::new(LOCAL)
            .with_seed_peer("garbage")
            .with_seed_peer(REMOTE);
        let mut node = Node::new(config, identity, transport.clone());

        node.bootstrap();

        assert_eq!(node.table().len(), 1);
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_send_to_unknown_peer() {
        let transport = Arc::new(RecordingTransport::default());
        let node = test_node(LOCAL, transport);

        let env = Envelope::from_slice(br#"{"type": "ping"}"#).unwrap();
        assert!(matches!(
            node.send_to(REMOTE, &env),
            Err(P2pError::PeerNotFound(_))
        ));
    }

    #[test]
    fn test_unreadable_payload_is_dropped() {
        let transport = Arc::new(RecordingTransport::default());
        let mut node = test_node(LOCAL, transport.clone());

        node.on_raw_message(REMOTE, b"\xff\xfe not a message");

        assert!(node.table().is_empty());
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_non_handshake_goes_to_node_hook() {
        struct CountingHook(Mutex<usize>);
        impl MessageHook for CountingHook {
            fn on_message(&self, _from: &str, _message: &Envelope) {
                *self.0.lock().unwrap() += 1;
            }
        }

        let transport = Arc::new(RecordingTransport::default());
        let hook = Arc::new(CountingHook(Mutex::new(0)));
        let identity = Identity::generate("tester");
        let mut node = Node::new(NodeConfig::new(LOCAL), identity, transport)
            .with_hook(hook.clone());

        node.on_raw_message(REMOTE, br#"{"type": "order", "item": "salt"}"#);

        assert_eq!(*hook.0.lock().unwrap(), 1);
        // Application traffic never creates table entries.
        assert!(node.table().is_empty());
    }
}
