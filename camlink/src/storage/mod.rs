// camlink-rs/camlink/src/storage/mod.rs
//! Sector-addressed storage the image packets are streamed into.

/// LCD/SD bridge driver.
pub mod lcd;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::constants::SECTOR_SIZE;
use crate::types::SectorAddress;
use crate::{Error, Result, StorageOp};

pub use lcd::LcdBridge;

/// One 512-byte sector.
pub type Sector = [u8; SECTOR_SIZE];

/// Sector-addressed medium. Every call is a blocking request/acknowledge
/// exchange; a failed acknowledgement comes back as an error and the caller
/// decides what to do with it.
pub trait StorageSink {
    /// Prepare the medium. Most sinks need nothing.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Point the read/write cursor at `sector`.
    fn set_sector_address(&mut self, sector: SectorAddress) -> Result<()>;

    /// Write 512 bytes to the sector under the cursor.
    fn write_sector(&mut self, data: &Sector) -> Result<()>;

    /// Commit buffered writes to the medium.
    fn flush(&mut self) -> Result<()>;

    /// Read the 512 bytes of the sector under the cursor.
    fn read_sector(&mut self, buf: &mut Sector) -> Result<()>;
}

impl<S: StorageSink + ?Sized> StorageSink for &mut S {
    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn set_sector_address(&mut self, sector: SectorAddress) -> Result<()> {
        (**self).set_sector_address(sector)
    }

    fn write_sector(&mut self, data: &Sector) -> Result<()> {
        (**self).write_sector(data)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn read_sector(&mut self, buf: &mut Sector) -> Result<()> {
        (**self).read_sector(buf)
    }
}

impl<S: StorageSink> StorageSink for Rc<RefCell<S>> {
    fn init(&mut self) -> Result<()> {
        self.borrow_mut().init()
    }

    fn set_sector_address(&mut self, sector: SectorAddress) -> Result<()> {
        self.borrow_mut().set_sector_address(sector)
    }

    fn write_sector(&mut self, data: &Sector) -> Result<()> {
        self.borrow_mut().write_sector(data)
    }

    fn flush(&mut self) -> Result<()> {
        self.borrow_mut().flush()
    }

    fn read_sector(&mut self, buf: &mut Sector) -> Result<()> {
        self.borrow_mut().read_sector(buf)
    }
}

/// Operation log entry of a [`MemorySink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOp {
    /// `init`
    Init,
    /// `set_sector_address`
    SetSector(u32),
    /// `write_sector` at the current sector
    Write(u32),
    /// `flush`
    Flush,
    /// `read_sector` at the current sector
    Read(u32),
}

/// In-memory medium with an operation log and failure injection.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    sectors: BTreeMap<u32, Sector>,
    cursor: u32,
    unflushed: bool,
    failures: HashMap<StorageOp, u32>,
    /// Every request in arrival order, including failed ones
    pub ops: Vec<SinkOp>,
}

impl MemorySink {
    /// Empty medium, cursor at sector 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `times` requests of kind `op` fail their acknowledgement.
    pub fn fail_next(&mut self, op: StorageOp, times: u32) {
        *self.failures.entry(op).or_insert(0) += times;
    }

    /// Stored sector, if it was ever written.
    pub fn sector(&self, sector: u32) -> Option<&Sector> {
        self.sectors.get(&sector)
    }

    /// Number of sectors written.
    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    /// Sectors in address order, concatenated.
    pub fn contents(&self) -> Vec<u8> {
        self.sectors.values().flatten().copied().collect()
    }

    /// Sector numbers targeted by write requests, in order.
    pub fn written_sectors(&self) -> Vec<u32> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SinkOp::Write(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    /// Whether a write has not been flushed yet.
    pub fn has_unflushed_writes(&self) -> bool {
        self.unflushed
    }

    fn check(&mut self, op: StorageOp) -> Result<()> {
        match self.failures.get_mut(&op) {
            Some(n) if *n > 0 => {
                *n -= 1;
                Err(Error::StorageAck {
                    op,
                    expected: crate::constants::LCD_ACK,
                    actual: 0x00,
                })
            }
            _ => Ok(()),
        }
    }
}

impl StorageSink for MemorySink {
    fn init(&mut self) -> Result<()> {
        self.ops.push(SinkOp::Init);
        self.check(StorageOp::MediaInit)
    }

    fn set_sector_address(&mut self, sector: SectorAddress) -> Result<()> {
        self.ops.push(SinkOp::SetSector(sector.as_u32()));
        self.check(StorageOp::SetSectorAddress)?;
        self.cursor = sector.as_u32();
        Ok(())
    }

    fn write_sector(&mut self, data: &Sector) -> Result<()> {
        self.ops.push(SinkOp::Write(self.cursor));
        self.check(StorageOp::WriteSector)?;
        self.sectors.insert(self.cursor, *data);
        self.unflushed = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.ops.push(SinkOp::Flush);
        self.check(StorageOp::FlushMedia)?;
        self.unflushed = false;
        Ok(())
    }

    fn read_sector(&mut self, buf: &mut Sector) -> Result<()> {
        self.ops.push(SinkOp::Read(self.cursor));
        self.check(StorageOp::ReadSector)?;
        *buf = self.sectors.get(&self.cursor).copied().unwrap_or([0u8; SECTOR_SIZE]);
        Ok(())
    }
}
