// camlink-rs/camlink/src/protocol/commands.rs

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::protocol::Frame;
use crate::types::PacketIndex;

/// Parameters of the SET-INITIAL-PARAMS command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InitialParams {
    /// Colour format, parameter 1
    pub color_format: u8,
    /// RAW resolution, parameter 2
    pub raw_resolution: u8,
    /// JPEG resolution, parameter 3
    pub jpeg_resolution: u8,
}

impl InitialParams {
    /// 8-bit gray scale RAW
    pub const COLOR_RAW_GRAY8: u8 = 0x03;
    /// 160 x 120 RAW preview
    pub const RAW_160X120: u8 = 0x03;
    /// 320 x 240, the size of the attached display
    pub const JPEG_320X240: u8 = 0x05;
}

impl Default for InitialParams {
    fn default() -> Self {
        Self {
            color_format: Self::COLOR_RAW_GRAY8,
            raw_resolution: Self::RAW_160X120,
            jpeg_resolution: Self::JPEG_320X240,
        }
    }
}

/// SNAPSHOT parameter 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SnapshotKind {
    /// JPEG
    Compressed = 0x00,
    /// RAW
    Uncompressed = 0x01,
}

/// GET-PICTURE parameter 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PictureKind {
    /// The picture frozen by SNAPSHOT
    Snapshot = 0x01,
    /// Live RAW picture
    Raw = 0x02,
    /// Live JPEG picture
    Jpeg = 0x05,
}

/// Commands sent to the camera. Each encodes to exactly one [`Frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// SYNC beacon frame
    Sync,
    /// Generic acknowledgement: `{AA, 0E, command_id, counter, pkg_lo, pkg_hi}`
    Ack {
        /// Id of the command being acknowledged
        command_id: u8,
        /// Free-running counter, ignored by the camera
        counter: u8,
        /// Requested packet, little-endian in params 2 and 3
        package_id: u16,
    },
    /// SET-INITIAL-PARAMS
    Initial(InitialParams),
    /// SET-PACKAGE-SIZE in bytes
    SetPackageSize(u16),
    /// SNAPSHOT
    Snapshot {
        /// Compressed or uncompressed capture
        kind: SnapshotKind,
        /// Frames to drop before capturing
        skip_frames: u16,
    },
    /// GET-PICTURE
    GetPicture(PictureKind),
}

impl Command {
    /// ACK sent back after the camera's own SYNC.
    pub const fn sync_ack() -> Self {
        Self::Ack {
            command_id: CMD_SYNC,
            counter: 0,
            package_id: 0,
        }
    }

    /// ACK that asks the camera for the given image packet.
    pub const fn custom_ack(index: PacketIndex) -> Self {
        Self::Ack {
            command_id: 0,
            counter: 0,
            package_id: index.as_u16(),
        }
    }

    /// Return the command id placed at frame offset 1.
    pub fn command_id(&self) -> u8 {
        match self {
            Self::Sync => CMD_SYNC,
            Self::Ack { .. } => CMD_ACK,
            Self::Initial(_) => CMD_INITIAL,
            Self::SetPackageSize(_) => CMD_SET_PACKAGE_SIZE,
            Self::Snapshot { .. } => CMD_SNAPSHOT,
            Self::GetPicture(_) => CMD_GET_PICTURE,
        }
    }

    /// Encode the command into its wire frame.
    pub fn to_frame(&self) -> Frame {
        let id = self.command_id();
        match *self {
            Self::Sync => Frame::new(id, [0, 0, 0, 0]),
            Self::Ack {
                command_id,
                counter,
                package_id,
            } => {
                // Indices up to 0xFF fit in param2 and leave param3 zero,
                // which is what older camera firmware expects.
                let [lo, hi] = package_id.to_le_bytes();
                Frame::new(id, [command_id, counter, lo, hi])
            }
            Self::Initial(p) => Frame::new(
                id,
                [0x00, p.color_format, p.raw_resolution, p.jpeg_resolution],
            ),
            Self::SetPackageSize(size) => {
                let [lo, hi] = size.to_le_bytes();
                Frame::new(id, [0x08, lo, hi, 0x00])
            }
            Self::Snapshot { kind, skip_frames } => {
                let [lo, hi] = skip_frames.to_le_bytes();
                Frame::new(id, [kind as u8, lo, hi, 0x00])
            }
            Self::GetPicture(kind) => Frame::new(id, [kind as u8, 0, 0, 0]),
        }
    }
}

impl From<Command> for Frame {
    fn from(cmd: Command) -> Self {
        cmd.to_frame()
    }
}
