// camlink-rs/camlink/src/transport/hal.rs

use embedded_hal_nb::serial::{Error as _, Read, Write};
use nb::block;

use crate::transport::traits::ByteTransport;
use crate::{Error, Result};

/// Serial port driven through the `embedded-hal-nb` traits.
///
/// `nb::block!` spins on `WouldBlock`, which is exactly the busy-wait on the
/// TXFF / RXFE flags. `rx_ready` has no portable flag to read, so it reads a
/// byte eagerly and holds it until the next `receive_byte`.
pub struct SerialTransport<S> {
    serial: S,
    peeked: Option<u8>,
}

impl<S> SerialTransport<S>
where
    S: Read<u8> + Write<u8>,
{
    /// Transport over `serial`.
    pub fn new(serial: S) -> Self {
        Self {
            serial,
            peeked: None,
        }
    }

    /// Wait for the transmit FIFO to drain.
    pub fn flush(&mut self) -> Result<()> {
        block!(self.serial.flush()).map_err(|e| Error::Serial(format!("{:?}", e.kind())))
    }

    /// Give back the UART.
    pub fn into_inner(self) -> S {
        self.serial
    }
}

impl<S> ByteTransport for SerialTransport<S>
where
    S: Read<u8> + Write<u8>,
{
    fn send_byte(&mut self, byte: u8) -> Result<()> {
        block!(self.serial.write(byte)).map_err(|e| Error::Serial(format!("{:?}", e.kind())))
    }

    fn receive_byte(&mut self) -> Result<u8> {
        if let Some(b) = self.peeked.take() {
            return Ok(b);
        }
        block!(self.serial.read()).map_err(|e| Error::Serial(format!("{:?}", e.kind())))
    }

    fn rx_ready(&mut self) -> Result<bool> {
        if self.peeked.is_some() {
            return Ok(true);
        }
        match self.serial.read() {
            Ok(b) => {
                self.peeked = Some(b);
                Ok(true)
            }
            Err(nb::Error::WouldBlock) => Ok(false),
            Err(nb::Error::Other(e)) => Err(Error::Serial(format!("{:?}", e.kind()))),
        }
    }
}
