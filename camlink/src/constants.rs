// camlink-rs/camlink/src/constants.rs
//! Protocol constants shared across the crate

/// Every camera frame starts with this byte
pub const FRAME_SENTINEL: u8 = 0xAA;

/// Camera frames are always six bytes long
pub const FRAME_LEN: usize = 6;

/// Camera command / reply identifiers (frame offset 1)
pub const CMD_INITIAL: u8 = 0x01;
/// GET-PICTURE: start sending the stored picture
pub const CMD_GET_PICTURE: u8 = 0x04;
/// SNAPSHOT: freeze the current frame in camera memory
pub const CMD_SNAPSHOT: u8 = 0x05;
/// SET-PACKAGE-SIZE
pub const CMD_SET_PACKAGE_SIZE: u8 = 0x06;
/// DATA-LENGTH reply carrying the picture size
pub const CMD_DATA_LENGTH: u8 = 0x0A;
/// SYNC, sent by both ends during the handshake
pub const CMD_SYNC: u8 = 0x0D;
/// ACK, also used to request a packet by index
pub const CMD_ACK: u8 = 0x0E;
/// NAK
pub const CMD_NAK: u8 = 0x0F;

/// Image packets and storage sectors share one size
pub const PACKAGE_SIZE: usize = 512;

/// Storage sector size in bytes
pub const SECTOR_SIZE: usize = PACKAGE_SIZE;

/// The DATA-LENGTH reply carries a 24-bit byte count
pub const MAX_IMAGE_BYTES: u32 = 0x00FF_FFFF;

/// LCD/SD bridge: extended command prefix, plain command prefix and ACK byte
pub const LCD_EXT_PREFIX: u8 = 0xFF;
/// Plain command prefix
pub const LCD_CMD_PREFIX: u8 = 0x00;
/// Acknowledgement byte
pub const LCD_ACK: u8 = 0x06;

/// LCD/SD bridge command codes (second byte after the prefix)
pub const LCD_MEDIA_INIT: u8 = 0x89;
/// Flush buffered sector data to the card
pub const LCD_FLUSH_MEDIA: u8 = 0x8A;
/// Set the sector address for the next read or write
pub const LCD_SET_SECTOR: u8 = 0x92;
/// Clear the screen
pub const LCD_CLEAR: u8 = 0xCD;
/// Read one sector
pub const LCD_READ_SECTOR: u8 = 0x16;
/// Write one sector
pub const LCD_WRITE_SECTOR: u8 = 0x17;
/// Print a NUL-terminated string
pub const LCD_WRITE_STRING: u8 = 0x18;

/// Longest string the display accepts before the NUL terminator
pub const LCD_MAX_STRING: usize = 511;
