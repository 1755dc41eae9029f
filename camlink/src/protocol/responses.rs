// camlink-rs/camlink/src/protocol/responses.rs

use crate::constants::*;
use crate::protocol::{Frame, FramePattern};
use crate::types::{ImageSize, PacketIndex};
use crate::{Error, Result};

/// Decoded camera reply. Unknown ids are kept as the raw frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Acknowledgement of `command_id`
    Ack {
        /// Acknowledged command
        command_id: u8,
        /// Camera-side counter
        counter: u8,
        /// Packet id, meaningful only for packet requests
        package_id: u16,
    },
    /// Negative acknowledgement
    Nak {
        /// Camera-side counter
        counter: u8,
        /// Camera error code
        error: u8,
    },
    /// The camera's own SYNC
    Sync,
    /// Picture size announcement
    DataLength {
        /// Firmware-specific id at offset 2
        kind: u8,
        /// Picture size
        size: ImageSize,
    },
    /// Any other id
    Other(Frame),
}

impl Reply {
    /// Decode a received frame. Only the sentinel is validated; field
    /// checks belong to the state machine waiting for a particular reply.
    pub fn decode(frame: &Frame) -> Result<Self> {
        if !frame.has_sentinel() {
            return Err(Error::FrameFormat(format!(
                "invalid sentinel {:#04x}",
                frame.sentinel()
            )));
        }
        let [p0, p1, p2, p3] = frame.params();
        let reply = match frame.id() {
            CMD_ACK => Self::Ack {
                command_id: p0,
                counter: p1,
                package_id: u16::from_le_bytes([p2, p3]),
            },
            CMD_NAK => Self::Nak {
                counter: p1,
                error: p2,
            },
            CMD_SYNC if frame.params() == [0, 0, 0, 0] => Self::Sync,
            CMD_DATA_LENGTH => Self::DataLength {
                kind: p0,
                size: ImageSize::from_le_bytes([p1, p2, p3]),
            },
            _ => Self::Other(*frame),
        };
        Ok(reply)
    }

    /// Whether the camera refused the command.
    pub fn is_nak(&self) -> bool {
        matches!(self, Self::Nak { .. })
    }
}

/// ACK the camera sends for a command: `{AA, 0E, command_id, _, 00, 00}`.
/// Offset 3 is the camera's ack counter and is not checked.
pub const fn ack_for(command_id: u8) -> FramePattern {
    FramePattern::new([
        Some(FRAME_SENTINEL),
        Some(CMD_ACK),
        Some(command_id),
        None,
        Some(0x00),
        Some(0x00),
    ])
}

/// The camera's own SYNC, which must match byte for byte.
pub const CAMERA_SYNC: FramePattern = FramePattern::exact(Frame::new(CMD_SYNC, [0, 0, 0, 0]));

/// DATA-LENGTH reply header: `{AA, 0A, id, _, _, _}`.
pub const fn data_length(id: u8) -> FramePattern {
    FramePattern::new([
        Some(FRAME_SENTINEL),
        Some(CMD_DATA_LENGTH),
        Some(id),
        None,
        None,
        None,
    ])
}

/// Picture size from a DATA-LENGTH frame, `None` if the header does not match.
pub fn decode_data_length(frame: &Frame, id: u8) -> Option<ImageSize> {
    if !data_length(id).matches(frame) {
        return None;
    }
    let [_, b3, b4, b5] = frame.params();
    Some(ImageSize::from_le_bytes([b3, b4, b5]))
}

/// Packet index requested by a custom ACK frame `{AA, 0E, 00, 00, lo, hi}`.
pub fn decode_custom_ack(frame: &Frame) -> Result<PacketIndex> {
    let pattern = FramePattern::new([
        Some(FRAME_SENTINEL),
        Some(CMD_ACK),
        Some(0x00),
        Some(0x00),
        None,
        None,
    ]);
    if let Some(offset) = pattern.first_mismatch(frame) {
        return Err(Error::FrameFormat(format!(
            "not a packet request: offset {} of {}",
            offset, frame
        )));
    }
    let [_, _, lo, hi] = frame.params();
    Ok(PacketIndex::from_le_bytes([lo, hi]))
}
