// camlink-rs/camlink/src/error.rs

use derive_more::Display;

use thiserror::Error;

use crate::protocol::Frame;

/// Protocol step that produced a fatal reply. The `Display` text is what
/// the operator sees on the status display before the session halts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Step {
    /// SYNC handshake
    #[display(fmt = "Sync")]
    Sync,
    /// SET-INITIAL-PARAMS
    #[display(fmt = "Image Parameters")]
    ImageParameters,
    /// SET-PACKAGE-SIZE
    #[display(fmt = "Package Size")]
    PackageSize,
    /// SNAPSHOT
    #[display(fmt = "Snapshot")]
    Snapshot,
    /// GET-PICTURE
    #[display(fmt = "Get Picture")]
    GetPicture,
    /// Packet loop
    #[display(fmt = "Transferring")]
    Transferring,
}

impl Step {
    /// Line shown to the operator when this step fails.
    pub fn fatal_message(&self) -> String {
        let verb = match self {
            Self::ImageParameters => "have",
            _ => "has",
        };
        format!("{} {} gone wrong. Please shut down system.", self, verb)
    }
}

/// Storage bridge request that failed its acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StorageOp {
    /// Card mount
    #[display(fmt = "media init")]
    MediaInit,
    /// Sector address
    #[display(fmt = "set sector address")]
    SetSectorAddress,
    /// Sector write
    #[display(fmt = "write sector")]
    WriteSector,
    /// Sector read
    #[display(fmt = "read sector")]
    ReadSector,
    /// Flush
    #[display(fmt = "flush media")]
    FlushMedia,
    /// Screen clear
    #[display(fmt = "clear screen")]
    Clear,
    /// Text output
    #[display(fmt = "write string")]
    WriteString,
}

/// Common error type
#[derive(Error, Debug)]
pub enum Error {
    /// Host transport ran dry where hardware would hang
    #[error("operation timed out")]
    Timeout,

    /// Channel peer dropped
    #[error("serial peer disconnected")]
    Disconnected,

    /// UART error from embedded-hal
    #[error("serial error: {0}")]
    Serial(String),

    /// GPIO error from embedded-hal
    #[error("reset line error: {0}")]
    Pin(String),

    /// Buffer of the wrong length for a frame
    #[error("invalid frame length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Required length
        expected: usize,
        /// Length supplied
        actual: usize,
    },

    /// Malformed frame
    #[error("frame format error: {0}")]
    FrameFormat(String),

    /// Fatal unexpected camera reply
    #[error("{} (received {actual})", .step.fatal_message())]
    ProtocolViolation {
        /// Step that was waiting for the reply
        step: Step,
        /// Frame that arrived instead
        actual: Frame,
    },

    /// Handshake attempt limit reached
    #[error("camera did not acknowledge SYNC after {attempts} attempts")]
    SyncExhausted {
        /// SYNC frames sent
        attempts: u32,
    },

    /// Storage bridge refused a request
    #[error("{op} failed: expected {expected:#04x}, got {actual:#04x}")]
    StorageAck {
        /// Request that failed
        op: StorageOp,
        /// Byte that signals success
        expected: u8,
        /// Byte received
        actual: u8,
    },

    /// No SD card in the slot
    #[error("SD card not present")]
    MediaNotPresent,

    /// Sector read-back differs from what was written
    #[error("sector {sector} read back differs from the written packet")]
    VerifyMismatch {
        /// Sector that was read back
        sector: u32,
    },

    /// Rejected configuration or request
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl Error {
    /// The protocol step for fatal camera replies, `None` for every other error.
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::ProtocolViolation { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Storage failures are the only class the transfer loop may tolerate.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::StorageAck { .. } | Self::MediaNotPresent | Self::VerifyMismatch { .. }
        )
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;
