// camlink-rs/camlink/src/transport/traits.rs

use crate::Result;

/// Byte-level serial link. Keeps protocol and state-machine logic away from
/// the UART.
///
/// Both directions block until the line is ready. Hardware implementations
/// busy-wait on the FIFO flags and never fail on their own; host
/// implementations return [`crate::Error::Timeout`] or
/// [`crate::Error::Disconnected`] where real hardware would hang.
pub trait ByteTransport {
    /// Wait while the transmit FIFO is full, then queue `byte`.
    fn send_byte(&mut self, byte: u8) -> Result<()>;

    /// Wait while the receive FIFO is empty, then return the next byte.
    fn receive_byte(&mut self) -> Result<u8>;

    /// Non-blocking check of the receive FIFO ("receive not empty").
    fn rx_ready(&mut self) -> Result<bool>;

    /// Send every byte of `data` in order.
    fn send_all(&mut self, data: &[u8]) -> Result<()> {
        for &b in data {
            self.send_byte(b)?;
        }
        Ok(())
    }

    /// Fill `buf` with exactly `buf.len()` received bytes.
    fn receive_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        for slot in buf.iter_mut() {
            *slot = self.receive_byte()?;
        }
        Ok(())
    }
}

impl<T: ByteTransport + ?Sized> ByteTransport for &mut T {
    fn send_byte(&mut self, byte: u8) -> Result<()> {
        (**self).send_byte(byte)
    }

    fn receive_byte(&mut self) -> Result<u8> {
        (**self).receive_byte()
    }

    fn rx_ready(&mut self) -> Result<bool> {
        (**self).rx_ready()
    }
}

impl<T: ByteTransport + ?Sized> ByteTransport for Box<T> {
    fn send_byte(&mut self, byte: u8) -> Result<()> {
        (**self).send_byte(byte)
    }

    fn receive_byte(&mut self) -> Result<u8> {
        (**self).receive_byte()
    }

    fn rx_ready(&mut self) -> Result<bool> {
        (**self).rx_ready()
    }
}
