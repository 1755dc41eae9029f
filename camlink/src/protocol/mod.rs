// camlink-rs/camlink/src/protocol/mod.rs

/// Outbound commands.
pub mod commands;
/// Six-byte frame and reply patterns.
pub mod frame;
/// Reply decoding.
pub mod responses;

pub use commands::{Command, InitialParams, PictureKind, SnapshotKind};
pub use frame::{Frame, FramePattern};
pub use responses::Reply;
