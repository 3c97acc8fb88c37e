//! Peer connections and the peer table.

pub mod connection;
pub mod state;
pub mod table;

pub use connection::PeerConnection;
pub use state::PeerState;
pub use table::PeerTable;
