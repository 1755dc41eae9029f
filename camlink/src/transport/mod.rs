// camlink-rs/camlink/src/transport/mod.rs

/// In-memory duplex link.
pub mod channel;
/// embedded-hal UART link.
#[cfg(feature = "hal")]
pub mod hal;
/// Scripted link for tests.
pub mod mock;
/// The byte transport trait.
pub mod traits;

pub use channel::ChannelTransport;
#[cfg(feature = "hal")]
pub use hal::SerialTransport;
pub use mock::MockTransport;
pub use traits::ByteTransport;
