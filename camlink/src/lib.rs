// camlink-rs/camlink/src/lib.rs

//! camlink
//!
//! Host-side driver for a serial RAW/JPEG camera module: the SYNC
//! handshake, the packetised picture transfer and the sector-addressed
//! storage the packets are streamed into.
#![warn(missing_docs)]

/// Camera command protocol.
pub mod camera;
/// Typed configuration.
pub mod config;
/// Protocol constants.
pub mod constants;
/// Operator status output.
pub mod display;
/// Error type.
pub mod error;
/// SYNC handshake.
pub mod handshake;
/// Common re-exports.
pub mod prelude;
/// Frame codec.
pub mod protocol;
/// End-to-end capture.
pub mod session;
/// Sector storage.
pub mod storage;
/// Simulated camera for tests and demos.
pub mod test_support;
/// Recurring timers.
pub mod timer;
/// Picture transfer.
pub mod transfer;
/// Byte transports.
pub mod transport;
/// Protocol newtypes.
pub mod types;
/// Helpers.
pub mod utils;

// Re-export the error type and newtypes at crate root so `crate::Error`,
// `crate::Result` and `crate::PacketIndex` resolve everywhere.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
