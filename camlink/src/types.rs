// camlink-rs/camlink/src/types.rs

use derive_more::{Display, From, Into};

use crate::constants::{MAX_IMAGE_BYTES, PACKAGE_SIZE};

/// Index of an image packet as carried by the custom ACK frame (u16 on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, From, Into)]
#[display(fmt = "packet #{}", _0)]
pub struct PacketIndex(u16);

impl PacketIndex {
    /// Wrap a raw packet index.
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Raw index.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Wire order of the custom ACK parameter bytes.
    pub fn to_le_bytes(&self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    /// Inverse of [`PacketIndex::to_le_bytes`].
    pub fn from_le_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_le_bytes(bytes))
    }

    /// Packets are written to the sector with the same index.
    pub fn sector(&self) -> SectorAddress {
        SectorAddress::new(u32::from(self.0))
    }
}

/// Sector number on the storage medium (u32, big-endian on the bridge wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, From, Into)]
#[display(fmt = "sector {}", _0)]
pub struct SectorAddress(u32);

impl SectorAddress {
    /// Wrap a raw sector number.
    pub const fn new(sector: u32) -> Self {
        Self(sector)
    }

    /// Raw sector number.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Bridge wire order, most significant byte first.
    pub fn to_be_bytes(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

/// Picture size in bytes as reported by the DATA-LENGTH reply (24 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, Into)]
#[display(fmt = "{} bytes", _0)]
pub struct ImageSize(u32);

impl ImageSize {
    /// Values wider than 24 bits are masked, the wire cannot carry them.
    pub const fn new(bytes: u32) -> Self {
        Self(bytes & MAX_IMAGE_BYTES)
    }

    /// Decode the three little-endian length bytes of a DATA-LENGTH frame.
    pub fn from_le_bytes(bytes: [u8; 3]) -> Self {
        Self(u32::from(bytes[2]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[0]))
    }

    /// Wire order of the DATA-LENGTH size bytes.
    pub fn to_le_bytes(&self) -> [u8; 3] {
        let b = self.0.to_le_bytes();
        [b[0], b[1], b[2]]
    }

    /// Size in bytes.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Number of whole packets (`floor(size / 512)`).
    pub fn full_packets(&self) -> u32 {
        self.0 / PACKAGE_SIZE as u32
    }

    /// Bytes left over after the whole packets.
    pub fn remainder(&self) -> u32 {
        self.0 % PACKAGE_SIZE as u32
    }
}
