// camlink-rs/camlink/src/protocol/frame.rs

use std::fmt;

use crate::constants::{FRAME_LEN, FRAME_SENTINEL};
use crate::{Error, Result};

/// Camera wire frame.
/// Format: [Sentinel(1)] [Id(1)] [Param0(1)] [Param1(1)] [Param2(1)] [Param3(1)]
/// Sentinel: 0xAA. There is no length field and no checksum.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Build an outbound frame; the sentinel is always filled in.
    pub const fn new(id: u8, params: [u8; 4]) -> Self {
        Self([FRAME_SENTINEL, id, params[0], params[1], params[2], params[3]])
    }

    /// Wrap six received bytes as-is. Inbound frames are not validated here
    /// because callers compare them against a [`FramePattern`] and report the
    /// raw bytes when the comparison fails.
    pub const fn from_bytes(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    /// All six bytes in wire order.
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Byte 0.
    pub fn sentinel(&self) -> u8 {
        self.0[0]
    }

    /// Command or reply id (byte 1).
    pub fn id(&self) -> u8 {
        self.0[1]
    }

    /// Parameter bytes 2 to 5.
    pub fn params(&self) -> [u8; 4] {
        [self.0[2], self.0[3], self.0[4], self.0[5]]
    }

    /// Whether byte 0 is `0xAA`.
    pub fn has_sentinel(&self) -> bool {
        self.0[0] == FRAME_SENTINEL
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != FRAME_LEN {
            return Err(Error::InvalidLength {
                expected: FRAME_LEN,
                actual: bytes.len(),
            });
        }
        if bytes[0] != FRAME_SENTINEL {
            return Err(Error::FrameFormat(format!(
                "invalid sentinel {:#04x}",
                bytes[0]
            )));
        }
        let mut arr = [0u8; FRAME_LEN];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }
}

impl From<Frame> for [u8; FRAME_LEN] {
    fn from(frame: Frame) -> Self {
        frame.0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::utils::bytes_to_hex_spaced(&self.0))
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame[{}]", self)
    }
}

/// Expected shape of an inbound frame. `None` marks a don't-care byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePattern([Option<u8>; FRAME_LEN]);

impl FramePattern {
    /// Pattern from per-byte expectations.
    pub const fn new(bytes: [Option<u8>; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    /// Every byte must match.
    pub const fn exact(frame: Frame) -> Self {
        let b = frame.0;
        Self([
            Some(b[0]),
            Some(b[1]),
            Some(b[2]),
            Some(b[3]),
            Some(b[4]),
            Some(b[5]),
        ])
    }

    /// Compare every byte that is not a don't-care.
    pub fn matches(&self, frame: &Frame) -> bool {
        self.0
            .iter()
            .zip(frame.0.iter())
            .all(|(want, got)| want.is_none_or(|w| w == *got))
    }

    /// Offset of the first byte that breaks the pattern.
    pub fn first_mismatch(&self, frame: &Frame) -> Option<usize> {
        self.0
            .iter()
            .zip(frame.0.iter())
            .position(|(want, got)| want.is_some_and(|w| w != *got))
    }
}
