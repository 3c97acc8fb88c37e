//! Acceptance tests for the handshake and peer-table layer.
//!
//! These tests verify the acceptance criteria:
//! 1. Convergence - Two nodes reach mutual key knowledge after one greeting
//! 2. Encryption upgrade - Post-handshake traffic is sealed on the wire
//! 3. Handshake termination - The hello exchange is exactly three messages
//! 4. Gossip - Third-party peers spread through profile announcements
//! 5. Identity proof - The pubkey challenge-response verifies end to end
//! 6. Dispatch loop - The actor loop processes inbound traffic and stops
//!    on shutdown

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use agora_core::{hash256, verify_digest, Identity, Signature};
use agora_p2p::{
    Envelope, MessageHook, Node, NodeConfig, P2pResult, PeerState, RawMessage, Transport,
};

const URI_A: &str = "tcp://203.0.113.1:12345";
const URI_B: &str = "tcp://203.0.113.2:12345";
const URI_C: &str = "tcp://203.0.113.3:12345";

/// In-flight messages: (from, to, bytes).
type Wire = Arc<Mutex<VecDeque<(String, String, Vec<u8>)>>>;

/// Transport stub that drops outbound bytes onto a shared wire, tagged
/// with the sending node's URI.
struct WireTransport {
    local: String,
    wire: Wire,
}

impl Transport for WireTransport {
    fn send_raw(&self, uri: &str, bytes: &[u8]) -> P2pResult<()> {
        self.wire
            .lock()
            .unwrap()
            .push_back((self.local.clone(), uri.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Hook that records every delivered application message.
#[derive(Default)]
struct RecordingHook {
    received: Mutex<Vec<(String, Envelope)>>,
}

impl MessageHook for RecordingHook {
    fn on_message(&self, from: &str, message: &Envelope) {
        self.received
            .lock()
            .unwrap()
            .push((from.to_string(), message.clone()));
    }
}

struct Network {
    wire: Wire,
    nodes: HashMap<String, Node>,
}

impl Network {
    fn new() -> Self {
        Self {
            wire: Arc::new(Mutex::new(VecDeque::new())),
            nodes: HashMap::new(),
        }
    }

    fn add_node(&mut self, uri: &str) {
        self.add_node_with_hook(uri, Arc::new(RecordingHook::default()));
    }

    fn add_node_with_hook(&mut self, uri: &str, hook: Arc<dyn MessageHook>) {
        let transport = Arc::new(WireTransport {
            local: uri.to_string(),
            wire: self.wire.clone(),
        });
        let identity = Identity::generate(uri);
        let node = Node::new(NodeConfig::new(uri), identity, transport).with_hook(hook);
        self.nodes.insert(uri.to_string(), node);
    }

    fn node(&self, uri: &str) -> &Node {
        &self.nodes[uri]
    }

    fn node_mut(&mut self, uri: &str) -> &mut Node {
        self.nodes.get_mut(uri).unwrap()
    }

    /// Deliver in-flight messages until the wire is quiet. Returns the
    /// number of messages delivered.
    fn pump(&mut self) -> usize {
        let mut delivered = 0;
        loop {
            let next = self.wire.lock().unwrap().pop_front();
            let Some((from, to, bytes)) = next else {
                return delivered;
            };
            delivered += 1;
            if let Some(node) = self.nodes.get_mut(&to) {
                node.on_raw_message(&from, &bytes);
            }
        }
    }
}

#[test]
fn test_two_nodes_converge() {
    let mut net = Network::new();
    net.add_node(URI_A);
    net.add_node(URI_B);

    net.node_mut(URI_A).greet(URI_B).unwrap();
    let delivered = net.pump();

    // first_contact, hello_request, hello_response - then silence.
    assert_eq!(delivered, 3);
    assert_eq!(net.node(URI_A).table().state_of(URI_B), PeerState::KnownWithKey);
    assert_eq!(net.node(URI_B).table().state_of(URI_A), PeerState::KnownWithKey);

    let key_a = net.node(URI_A).identity().public_key();
    let learned = net.node(URI_B).table().get(URI_A).unwrap().pubkey().cloned();
    assert_eq!(learned, Some(key_a));
}

#[test]
fn test_post_handshake_traffic_is_sealed() {
    let hook = Arc::new(RecordingHook::default());
    let mut net = Network::new();
    net.add_node(URI_A);
    net.add_node_with_hook(URI_B, hook.clone());

    net.node_mut(URI_A).greet(URI_B).unwrap();
    net.pump();

    let order = Envelope::from_slice(br#"{"type": "order", "item": "salt"}"#).unwrap();
    net.node(URI_A).send_to(URI_B, &order).unwrap();

    // Sealed on the wire: the raw bytes must not parse as JSON.
    {
        let wire = net.wire.lock().unwrap();
        assert_eq!(wire.len(), 1);
        assert!(Envelope::from_slice(&wire[0].2).is_err());
    }

    net.pump();
    let received = hook.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].0, URI_A);
    assert_eq!(received[0].1.extra["item"], "salt");
}

#[test]
fn test_pre_handshake_traffic_is_cleartext() {
    let mut net = Network::new();
    net.add_node(URI_A);
    net.add_node(URI_B);

    net.node_mut(URI_A).greet(URI_B).unwrap();

    // The greeting itself goes out before any key is known.
    let wire = net.wire.lock().unwrap();
    assert_eq!(wire.len(), 1);
    let env = Envelope::from_slice(&wire[0].2).unwrap();
    assert!(env.msg_type.is_none());
    assert_eq!(env.uri.as_deref(), Some(URI_A));
}

#[test]
fn test_gossip_spreads_peers() {
    let mut net = Network::new();
    net.add_node(URI_A);
    net.add_node(URI_B);
    net.add_node(URI_C);

    // A and B shake hands, then C greets B. B's replies now gossip A.
    net.node_mut(URI_A).greet(URI_B).unwrap();
    net.pump();
    net.node_mut(URI_C).greet(URI_B).unwrap();
    net.pump();

    // C learned about A second-hand, key included, without greeting it.
    assert_eq!(net.node(URI_C).table().state_of(URI_A), PeerState::KnownWithKey);
    let key_a = net.node(URI_A).identity().public_key();
    assert_eq!(
        net.node(URI_C).table().get(URI_A).unwrap().pubkey(),
        Some(&key_a)
    );
    // A never heard from C.
    assert_eq!(net.node(URI_A).table().state_of(URI_C), PeerState::Unknown);
}

#[test]
fn test_repeated_greetings_stay_bounded() {
    let mut net = Network::new();
    net.add_node(URI_A);
    net.add_node(URI_B);

    net.node_mut(URI_A).greet(URI_B).unwrap();
    let first = net.pump();
    assert_eq!(first, 3);

    // Greeting again re-runs the exchange but never loops.
    net.node_mut(URI_A).greet(URI_B).unwrap();
    let second = net.pump();
    assert!(second <= 3, "handshake must terminate, saw {second} messages");
    assert_eq!(net.node(URI_A).table().len(), 1);
    assert_eq!(net.node(URI_B).table().len(), 1);
}

#[test]
fn test_pubkey_proof_verifies() {
    let mut net = Network::new();
    net.add_node(URI_A);
    net.add_node(URI_B);

    net.node_mut(URI_A).greet(URI_B).unwrap();
    net.pump();

    // B challenges A for its announced key; A proves control of it.
    let claimed = net.node(URI_A).identity().public_key().to_hex();
    net.node(URI_A)
        .respond_pubkey_challenge(URI_B, "node-a", &claimed)
        .unwrap();

    let (_, _, bytes) = net.wire.lock().unwrap().pop_front().unwrap();
    // Sealed to B; decode with B's key.
    let opened = agora_core::open(&bytes, net.node(URI_B).identity().keypair()).unwrap();
    let reply = Envelope::from_slice(&opened).unwrap();

    assert_eq!(reply.msg_type.as_deref(), Some("pubkey_response"));
    let announced = net.node(URI_A).identity().public_key();
    assert_eq!(reply.extra["pubkey"], announced.to_hex());
    let sig = Signature::from_hex(reply.extra["signature"].as_str().unwrap()).unwrap();
    verify_digest(&announced, &hash256(&announced.to_bytes()), &sig).unwrap();
}

#[tokio::test]
async fn test_dispatch_loop_processes_and_stops() {
    let wire: Wire = Arc::new(Mutex::new(VecDeque::new()));
    let transport = Arc::new(WireTransport {
        local: URI_A.to_string(),
        wire: wire.clone(),
    });
    let node = Node::new(NodeConfig::new(URI_A), Identity::generate("a"), transport);

    let (inbox_tx, inbox_rx) = mpsc::unbounded_channel::<RawMessage>();
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    let handle = tokio::spawn(node.run(inbox_rx, shutdown_rx));

    // A first contact from B must trigger an outbound hello_request.
    let peer = Identity::generate("b");
    let profile = format!(
        r#"{{"uri": "{URI_B}", "pub": "{}"}}"#,
        peer.public_key().to_hex()
    );
    inbox_tx
        .send(RawMessage {
            from: URI_B.to_string(),
            bytes: profile.into_bytes(),
        })
        .unwrap();

    // Wait for the reply to land on the wire.
    for _ in 0..100 {
        if !wire.lock().unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let (_, to, bytes) = wire.lock().unwrap().pop_front().unwrap();
    assert_eq!(to, URI_B);
    let opened = agora_core::open(&bytes, peer.keypair()).unwrap();
    let reply = Envelope::from_slice(&opened).unwrap();
    assert_eq!(reply.msg_type.as_deref(), Some("hello_request"));

    shutdown_tx.send(()).await.unwrap();
    handle.await.unwrap();
}
