//! Peer protocol: messages, frame codec and the transport seam.
//!
//! The engine never touches sockets. Frames it produces are queued in its
//! outbox and handed to a [`Transport`] on flush; frames received from the
//! peer are passed to the engine already deframed.

pub mod message;
pub mod codec;

pub use message::{opcode, Message, RecordFrame, SetupFrame, WireBounds, CONFIG_DATA_SIZE, HEADER_SIZE, NONE_INDEX};
pub use codec::{decode, decode_config, encode, encode_config};

/// Reliable, ordered delivery of complete frames to the peer.
pub trait Transport {
    /// Queue one frame for sending.
    fn send(&mut self, frame: &[u8]);
}

impl Transport for Vec<Vec<u8>> {
    fn send(&mut self, frame: &[u8]) {
        self.push(frame.to_vec());
    }
}

impl Transport for std::collections::VecDeque<Vec<u8>> {
    fn send(&mut self, frame: &[u8]) {
        self.push_back(frame.to_vec());
    }
}
