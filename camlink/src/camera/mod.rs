// camlink-rs/camlink/src/camera/mod.rs

/// Camera reset line.
pub mod reset;

use log::debug;
#[cfg(feature = "diagnostics")]
use log::trace;

use crate::constants::FRAME_LEN;
use crate::protocol::commands::{InitialParams, PictureKind, SnapshotKind};
use crate::protocol::{Command, Frame};
use crate::transport::ByteTransport;
use crate::types::PacketIndex;
use crate::Result;

/// Camera command protocol on top of a byte transport.
///
/// Sending never checks anything; received frames are handed back by value
/// for the caller to compare against the reply it expects.
pub struct Camera<T> {
    transport: T,
}

impl<T: ByteTransport> Camera<T> {
    /// Camera on `transport`.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Transmit one frame, sentinel first.
    pub fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        #[cfg(feature = "diagnostics")]
        trace!("camera <- {}", frame);
        self.transport.send_all(frame.as_bytes())
    }

    /// Encode and send `cmd`.
    pub fn send_command(&mut self, cmd: &Command) -> Result<()> {
        debug!("camera <- {:?}", cmd);
        self.send_frame(&cmd.to_frame())
    }

    /// Exactly six blocking byte reads, in wire order.
    pub fn receive_frame(&mut self) -> Result<Frame> {
        let mut buf = [0u8; FRAME_LEN];
        self.transport.receive_exact(&mut buf)?;
        let frame = Frame::from_bytes(buf);
        #[cfg(feature = "diagnostics")]
        trace!("camera -> {}", frame);
        Ok(frame)
    }

    /// Send a command and read the single frame that answers it.
    pub fn exchange(&mut self, cmd: &Command) -> Result<Frame> {
        self.send_command(cmd)?;
        self.receive_frame()
    }

    /// Raw image bytes, bypassing frame parsing. Fills all of `buf`.
    pub fn receive_burst(&mut self, buf: &mut [u8]) -> Result<()> {
        self.transport.receive_exact(buf)
    }

    /// Whether a reply byte is waiting.
    pub fn rx_ready(&mut self) -> Result<bool> {
        self.transport.rx_ready()
    }

    /// One raw reply byte, for callers that assemble frames themselves.
    pub fn receive_byte(&mut self) -> Result<u8> {
        self.transport.receive_byte()
    }

    /// SYNC beacon frame.
    pub fn send_sync(&mut self) -> Result<()> {
        self.send_command(&Command::Sync)
    }

    /// ACK for the camera's SYNC.
    pub fn send_ack(&mut self) -> Result<()> {
        self.send_command(&Command::sync_ack())
    }

    /// Request image packet `index`.
    pub fn send_custom_ack(&mut self, index: PacketIndex) -> Result<()> {
        self.send_command(&Command::custom_ack(index))
    }

    /// SET-INITIAL-PARAMS.
    pub fn send_initial(&mut self, params: InitialParams) -> Result<()> {
        self.send_command(&Command::Initial(params))
    }

    /// SET-PACKAGE-SIZE.
    pub fn send_package_size(&mut self, size: u16) -> Result<()> {
        self.send_command(&Command::SetPackageSize(size))
    }

    /// SNAPSHOT.
    pub fn send_snapshot(&mut self, kind: SnapshotKind) -> Result<()> {
        self.send_command(&Command::Snapshot {
            kind,
            skip_frames: 0,
        })
    }

    /// GET-PICTURE.
    pub fn send_get_picture(&mut self, kind: PictureKind) -> Result<()> {
        self.send_command(&Command::GetPicture(kind))
    }

    /// Underlying link.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Underlying link, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the link.
    pub fn into_inner(self) -> T {
        self.transport
    }
}
