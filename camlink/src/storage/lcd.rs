// camlink-rs/camlink/src/storage/lcd.rs
//! Serial LCD module with an SD card slot.
//!
//! The module speaks a two-byte command protocol: extended commands start
//! with `0xFF`, plain ones with `0x00`. Every command is answered, and the
//! answer has to be drained even when nobody looks at it or the next
//! command's reply is misread.

use log::{debug, warn};

use crate::constants::*;
use crate::display::StatusDisplay;
use crate::storage::{Sector, StorageSink};
use crate::transport::ByteTransport;
use crate::types::SectorAddress;
use crate::utils::bytes_to_hex;
use crate::{Error, Result, StorageOp};

/// Status byte the module returns as the last reply byte on success.
const STATUS_OK: u8 = 0x01;

/// Storage sink and status display behind one serial link.
#[derive(Debug)]
pub struct LcdBridge<T> {
    transport: T,
}

impl<T: ByteTransport> LcdBridge<T> {
    /// Bridge on `transport`.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Underlying link.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Underlying link, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the link.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Mount the SD card. Replies with an ACK followed by a status pair
    /// whose low byte is zero when no card is inserted.
    pub fn media_init(&mut self) -> Result<()> {
        self.command(LCD_EXT_PREFIX, LCD_MEDIA_INIT)?;
        let mut reply = [0u8; 3];
        self.transport.receive_exact(&mut reply)?;
        debug!("lcd media init reply: {}", bytes_to_hex(&reply));
        Self::expect_ack(StorageOp::MediaInit, reply[0])?;
        if reply[2] == 0 {
            warn!("lcd: SD card not present");
            return Err(Error::MediaNotPresent);
        }
        Ok(())
    }

    /// Blank the screen and home the cursor.
    pub fn clear_screen(&mut self) -> Result<()> {
        self.command(LCD_EXT_PREFIX, LCD_CLEAR)?;
        let ack = self.transport.receive_byte()?;
        Self::expect_ack(StorageOp::Clear, ack)
    }

    /// Print `text` at the cursor. Text is cut at the first NUL and at 511
    /// bytes; the module appends nothing.
    pub fn write_string(&mut self, text: &str) -> Result<()> {
        let bytes = text.as_bytes();
        let end = bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(bytes.len())
            .min(LCD_MAX_STRING);
        self.command(LCD_CMD_PREFIX, LCD_WRITE_STRING)?;
        self.transport.send_all(&bytes[..end])?;
        self.transport.send_byte(0)?;
        let mut reply = [0u8; 3];
        self.transport.receive_exact(&mut reply)?;
        Self::expect_ack(StorageOp::WriteString, reply[0])
    }

    fn command(&mut self, prefix: u8, code: u8) -> Result<()> {
        self.transport.send_all(&[prefix, code])
    }

    fn expect_ack(op: StorageOp, actual: u8) -> Result<()> {
        Self::expect(op, LCD_ACK, actual)
    }

    fn expect(op: StorageOp, expected: u8, actual: u8) -> Result<()> {
        if actual == expected {
            return Ok(());
        }
        warn!(
            "lcd: {} failed: expected {:#04x}, got {:#04x}",
            op, expected, actual
        );
        Err(Error::StorageAck {
            op,
            expected,
            actual,
        })
    }

    /// The write and flush replies only carry meaning in their last byte.
    fn expect_status(op: StorageOp, reply: [u8; 3]) -> Result<()> {
        if reply[2] == 0 {
            Self::expect(op, STATUS_OK, 0)
        } else {
            Ok(())
        }
    }
}

impl<T: ByteTransport> StorageSink for LcdBridge<T> {
    fn init(&mut self) -> Result<()> {
        self.media_init()
    }

    fn set_sector_address(&mut self, sector: SectorAddress) -> Result<()> {
        self.command(LCD_EXT_PREFIX, LCD_SET_SECTOR)?;
        self.transport.send_all(&sector.to_be_bytes())?;
        let ack = self.transport.receive_byte()?;
        Self::expect_ack(StorageOp::SetSectorAddress, ack)
    }

    fn write_sector(&mut self, data: &Sector) -> Result<()> {
        self.command(LCD_CMD_PREFIX, LCD_WRITE_SECTOR)?;
        self.transport.send_all(data)?;
        let mut reply = [0u8; 3];
        self.transport.receive_exact(&mut reply)?;
        Self::expect_status(StorageOp::WriteSector, reply)
    }

    fn flush(&mut self) -> Result<()> {
        self.command(LCD_EXT_PREFIX, LCD_FLUSH_MEDIA)?;
        let mut reply = [0u8; 3];
        self.transport.receive_exact(&mut reply)?;
        Self::expect_status(StorageOp::FlushMedia, reply)
    }

    fn read_sector(&mut self, buf: &mut Sector) -> Result<()> {
        self.command(LCD_CMD_PREFIX, LCD_READ_SECTOR)?;
        let mut header = [0u8; 2];
        self.transport.receive_exact(&mut header)?;
        self.transport.receive_exact(buf)?;
        Self::expect_ack(StorageOp::ReadSector, header[0])
    }
}

impl<T: ByteTransport> StatusDisplay for LcdBridge<T> {
    fn clear(&mut self) -> Result<()> {
        self.clear_screen()
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.write_string(line)
    }
}
