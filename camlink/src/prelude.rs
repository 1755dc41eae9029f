// camlink-rs/camlink/src/prelude.rs

pub use crate::camera::reset::{CountingReset, ResetLine};
pub use crate::camera::Camera;
pub use crate::config::{
    CaptureConfig, FirmwareRevision, HandshakeConfig, PacketCountMode, SinkFailurePolicy,
    TransferConfig,
};
pub use crate::display::{LogDisplay, RecordingDisplay, StatusDisplay};
pub use crate::handshake::{Handshake, HandshakeReport, HandshakeState};
pub use crate::protocol::{Command, Frame, FramePattern, Reply};
pub use crate::session::{CaptureReport, CaptureSession};
pub use crate::storage::{LcdBridge, MemorySink, SinkOp, StorageSink};
pub use crate::timer::{ManualTimer, MonotonicTimer, SyncBeacon, TimerService};
pub use crate::transfer::{ImageTransfer, TransferReport, TransferSession, TransferState};
pub use crate::transport::{ByteTransport, ChannelTransport, MockTransport};
pub use crate::{Error, ImageSize, PacketIndex, Result, SectorAddress, Step, StorageOp};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, hex_preview};
