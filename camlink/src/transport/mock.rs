// camlink-rs/camlink/src/transport/mock.rs

use std::collections::VecDeque;
use std::fmt;

use crate::constants::{FRAME_LEN, FRAME_SENTINEL};
use crate::protocol::Frame;
use crate::transport::traits::ByteTransport;
use crate::{Error, Result};

/// Called with every complete frame the host sends; the returned bytes are
/// queued for the host to receive.
pub type Responder = Box<dyn FnMut(&Frame) -> Vec<u8>>;

/// Mock transport for unit tests. It records sent bytes and returns queued
/// bytes. An exhausted queue yields `Error::Timeout` instead of hanging.
pub struct MockTransport {
    /// Every byte sent, in order
    pub sent: Vec<u8>,
    /// Bytes waiting to be received
    pub incoming: VecDeque<u8>,
    responder: Option<Responder>,
    partial: Vec<u8>,
}

impl MockTransport {
    /// Transport with no script.
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            incoming: VecDeque::new(),
            responder: None,
            partial: Vec::with_capacity(FRAME_LEN),
        }
    }

    /// Mock that answers each outbound frame through `responder`.
    pub fn with_responder(responder: impl FnMut(&Frame) -> Vec<u8> + 'static) -> Self {
        let mut m = Self::new();
        m.set_responder(responder);
        m
    }

    /// Replace the responder.
    pub fn set_responder(&mut self, responder: impl FnMut(&Frame) -> Vec<u8> + 'static) {
        self.responder = Some(Box::new(responder));
    }

    /// Queue raw bytes for receiving.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().copied());
    }

    /// Queue a frame for receiving.
    pub fn push_frame(&mut self, frame: Frame) {
        self.push_bytes(frame.as_bytes());
    }

    /// Everything sent so far, split into 6-byte frames. Only meaningful on
    /// the camera link where the host sends nothing but frames.
    pub fn sent_frames(&self) -> Vec<Frame> {
        self.sent
            .chunks_exact(FRAME_LEN)
            .map(|c| {
                let mut arr = [0u8; FRAME_LEN];
                arr.copy_from_slice(c);
                Frame::from_bytes(arr)
            })
            .collect()
    }

    /// Number of times `frame` was sent.
    pub fn count_sent(&self, frame: Frame) -> usize {
        self.sent_frames().iter().filter(|f| **f == frame).count()
    }

    /// Forget sent bytes.
    pub fn clear_sent(&mut self) {
        self.sent.clear();
        self.partial.clear();
    }

    fn track_outbound(&mut self, byte: u8) {
        // Resynchronise on the sentinel so a stray byte cannot shift every
        // following frame.
        if self.partial.is_empty() && byte != FRAME_SENTINEL {
            return;
        }
        self.partial.push(byte);
        if self.partial.len() < FRAME_LEN {
            return;
        }
        let mut arr = [0u8; FRAME_LEN];
        arr.copy_from_slice(&self.partial);
        self.partial.clear();
        if let Some(responder) = self.responder.as_mut() {
            let reply = responder(&Frame::from_bytes(arr));
            self.incoming.extend(reply);
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport")
            .field("sent", &self.sent.len())
            .field("incoming", &self.incoming.len())
            .field("responder", &self.responder.is_some())
            .finish()
    }
}

impl ByteTransport for MockTransport {
    fn send_byte(&mut self, byte: u8) -> Result<()> {
        self.sent.push(byte);
        self.track_outbound(byte);
        Ok(())
    }

    fn receive_byte(&mut self) -> Result<u8> {
        self.incoming.pop_front().ok_or(Error::Timeout)
    }

    fn rx_ready(&mut self) -> Result<bool> {
        Ok(!self.incoming.is_empty())
    }
}
