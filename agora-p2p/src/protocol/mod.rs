//! Wire protocol messages.

pub mod messages;

pub use messages::{
    Envelope, Profile, HELLO_REQUEST, HELLO_RESPONSE, PUBKEY_RESPONSE,
};
