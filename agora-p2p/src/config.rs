//! Node configuration.

/// Configuration for a protocol node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// The local node's own peer URI (e.g. `tcp://203.0.113.1:12345`).
    pub uri: String,

    /// Seed peers greeted with a first-contact profile at bootstrap.
    pub seed_peers: Vec<String>,
}

impl NodeConfig {
    /// Create a new configuration with the given local URI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            seed_peers: Vec::new(),
        }
    }

    /// Set the seed peers to greet at bootstrap.
    pub fn with_seed_peers(mut self, seeds: Vec<String>) -> Self {
        self.seed_peers = seeds;
        self
    }

    /// Add a single seed peer.
    pub fn with_seed_peer(mut self, seed: impl Into<String>) -> Self {
        self.seed_peers.push(seed.into());
        self
    }
}
