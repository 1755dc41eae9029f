// camlink-rs/camlink/src/config.rs
//! Capture configuration.
//!
//! Defaults reproduce the values the camera firmware was driven with on the
//! bench: RAW 8-bit gray at 160x120, 512-byte packages, a 5 ms SYNC beacon
//! that slows by 1 ms per reset cycle and a reset after ten bad replies.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{PACKAGE_SIZE, SECTOR_SIZE};
use crate::protocol::commands::{InitialParams, PictureKind, SnapshotKind};
use crate::{Error, Result};

/// Camera firmware revisions disagree on the id carried at offset 2 of the
/// DATA-LENGTH reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FirmwareRevision {
    /// DATA-LENGTH echoes `0x01`
    #[default]
    A,
    /// DATA-LENGTH echoes `0x02`
    B,
}

impl FirmwareRevision {
    /// Id expected at offset 2 of DATA-LENGTH.
    pub fn data_length_id(&self) -> u8 {
        match self {
            Self::A => 0x01,
            Self::B => 0x02,
        }
    }
}

/// How the number of packets is derived from the reported picture size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PacketCountMode {
    /// `floor(total / 512)`; a trailing partial packet is never requested.
    #[default]
    Truncate,
    /// `ceil(total / 512)`; the trailing partial packet is received short
    /// and zero-padded in its sector.
    RoundUp,
}

/// What the transfer loop does when the storage sink reports a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SinkFailurePolicy {
    /// Halt the capture with the storage error.
    #[default]
    Abort,
    /// Log the failure, record it in the report and move to the next packet.
    Continue,
    /// Repeat the sector write (address, write, flush) up to `attempts`
    /// more times, then abort.
    Retry {
        /// Extra attempts after the first failure
        attempts: u8,
    },
}

/// SYNC handshake tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandshakeConfig {
    /// Consecutive bad replies that trigger a hardware reset
    pub reset_threshold: u32,
    /// SYNC beacon period for the first cycle
    pub initial_sync_interval: Duration,
    /// Added to the beacon period after every reset cycle
    pub sync_interval_step: Duration,
    /// Give up after this many SYNC frames; `None` keeps trying forever
    pub sync_attempt_limit: Option<u32>,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            reset_threshold: 10,
            initial_sync_interval: Duration::from_millis(5),
            sync_interval_step: Duration::from_millis(1),
            sync_attempt_limit: None,
        }
    }
}

/// Picture request and storage settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransferConfig {
    /// SET-INITIAL-PARAMS payload
    pub initial_params: InitialParams,
    /// Package size requested from the camera. Packets are stored one per
    /// sector so this never exceeds the sector size.
    pub package_size: u16,
    /// SNAPSHOT format
    pub snapshot_kind: SnapshotKind,
    /// GET-PICTURE source
    pub picture_kind: PictureKind,
    /// Camera firmware revision
    pub firmware: FirmwareRevision,
    /// Handling of a trailing partial packet
    pub packet_count: PacketCountMode,
    /// Pause after each configuration command before reading its reply
    pub settle_delay: Duration,
    /// Reaction to storage failures
    pub sink_failure: SinkFailurePolicy,
    /// Read every sector back after flushing and compare it to the packet
    pub verify_writes: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            initial_params: InitialParams::default(),
            package_size: PACKAGE_SIZE as u16,
            snapshot_kind: SnapshotKind::Uncompressed,
            picture_kind: PictureKind::Raw,
            firmware: FirmwareRevision::default(),
            packet_count: PacketCountMode::default(),
            settle_delay: Duration::ZERO,
            sink_failure: SinkFailurePolicy::default(),
            verify_writes: false,
        }
    }
}

impl TransferConfig {
    /// Reject settings the transfer loop cannot honour.
    pub fn validate(&self) -> Result<()> {
        let size = usize::from(self.package_size);
        if size == 0 || size > SECTOR_SIZE {
            return Err(Error::UnsupportedOperation(format!(
                "package size {} outside 1..={}",
                size, SECTOR_SIZE
            )));
        }
        if let SinkFailurePolicy::Retry { attempts: 0 } = self.sink_failure {
            return Err(Error::UnsupportedOperation(
                "retry policy with zero attempts".into(),
            ));
        }
        Ok(())
    }
}

/// Everything one capture run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaptureConfig {
    /// Handshake settings
    pub handshake: HandshakeConfig,
    /// Transfer settings
    pub transfer: TransferConfig,
    /// Initialise the storage medium before talking to the camera
    pub media_init: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            handshake: HandshakeConfig::default(),
            transfer: TransferConfig::default(),
            media_init: true,
        }
    }
}
