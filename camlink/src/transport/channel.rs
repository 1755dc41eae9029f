// camlink-rs/camlink/src/transport/channel.rs

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::time::Duration;

use crate::transport::traits::ByteTransport;
use crate::{Error, Result};

/// Default per-direction queue depth of [`ChannelTransport::pair`].
pub const DEFAULT_CHANNEL_DEPTH: usize = 4096;

/// One end of a synchronous in-memory serial line.
///
/// Each direction is a bounded queue: `send_byte` blocks while the peer's
/// queue is full and `receive_byte` blocks until a byte arrives, the same
/// contract as the UART FIFOs. Intended for running a simulated camera or
/// storage bridge on another thread.
#[derive(Debug)]
pub struct ChannelTransport {
    tx: SyncSender<u8>,
    rx: Receiver<u8>,
    peeked: Option<u8>,
    receive_timeout: Option<Duration>,
}

impl ChannelTransport {
    /// Two connected ends with [`DEFAULT_CHANNEL_DEPTH`] bytes of buffering.
    pub fn pair() -> (Self, Self) {
        Self::pair_with_depth(DEFAULT_CHANNEL_DEPTH)
    }

    /// Connected pair with `depth` bytes of buffering per direction.
    pub fn pair_with_depth(depth: usize) -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::sync_channel(depth);
        let (b_tx, a_rx) = mpsc::sync_channel(depth);
        (Self::from_parts(a_tx, a_rx), Self::from_parts(b_tx, b_rx))
    }

    fn from_parts(tx: SyncSender<u8>, rx: Receiver<u8>) -> Self {
        Self {
            tx,
            rx,
            peeked: None,
            receive_timeout: None,
        }
    }

    /// Bound every blocking receive. Without a timeout a silent peer blocks
    /// forever, as on the real line.
    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = Some(timeout);
        self
    }
}

impl ByteTransport for ChannelTransport {
    fn send_byte(&mut self, byte: u8) -> Result<()> {
        self.tx.send(byte).map_err(|_| Error::Disconnected)
    }

    fn receive_byte(&mut self) -> Result<u8> {
        if let Some(b) = self.peeked.take() {
            return Ok(b);
        }
        match self.receive_timeout {
            Some(timeout) => self.rx.recv_timeout(timeout).map_err(|e| match e {
                RecvTimeoutError::Timeout => Error::Timeout,
                RecvTimeoutError::Disconnected => Error::Disconnected,
            }),
            None => self.rx.recv().map_err(|_| Error::Disconnected),
        }
    }

    fn rx_ready(&mut self) -> Result<bool> {
        if self.peeked.is_some() {
            return Ok(true);
        }
        match self.rx.try_recv() {
            Ok(b) => {
                self.peeked = Some(b);
                Ok(true)
            }
            Err(TryRecvError::Empty) => Ok(false),
            Err(TryRecvError::Disconnected) => Err(Error::Disconnected),
        }
    }
}
