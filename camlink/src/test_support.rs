// camlink-rs/camlink/src/test_support.rs
//! Test support helpers intended for use by unit and integration tests.
//!
//! [`ScriptedCamera`] answers host frames the way the camera module does, so
//! handshake and transfer code can be driven through a `MockTransport`
//! responder or across a `ChannelTransport` from another thread.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::config::FirmwareRevision;
use crate::constants::*;
use crate::protocol::Frame;
use crate::protocol::responses::decode_custom_ack;
use crate::transport::ByteTransport;
use crate::types::{ImageSize, PacketIndex};
use crate::{Error, Result};

/// Camera's acknowledgement of `command_id`.
#[doc(hidden)]
pub fn ack_frame(command_id: u8, counter: u8) -> Frame {
    Frame::new(CMD_ACK, [command_id, counter, 0, 0])
}

/// NAK with the given error code.
#[doc(hidden)]
pub fn nak_frame(counter: u8, error: u8) -> Frame {
    Frame::new(CMD_NAK, [0, counter, error, 0])
}

#[doc(hidden)]
pub fn camera_sync_frame() -> Frame {
    Frame::new(CMD_SYNC, [0, 0, 0, 0])
}

#[doc(hidden)]
pub fn data_length_frame(id: u8, size: ImageSize) -> Frame {
    let [b3, b4, b5] = size.to_le_bytes();
    Frame::new(CMD_DATA_LENGTH, [id, b3, b4, b5])
}

/// Handshake-only responder: NAKs every SYNC before the `ack_on`-th one
/// (1-based), then acknowledges it and sends the camera's own SYNC.
#[doc(hidden)]
pub fn sync_responder(ack_on: u32) -> impl FnMut(&Frame) -> Vec<u8> + 'static {
    let mut cam = ScriptedCamera::new(Vec::new()).ack_on_sync(ack_on);
    move |frame| cam.respond(frame)
}

/// Deterministic image bytes: byte `i` is `i % 251`.
#[doc(hidden)]
pub fn sample_image(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Simulated camera module.
#[derive(Debug, Clone)]
pub struct ScriptedCamera {
    image: Vec<u8>,
    ack_on_sync: u32,
    firmware: FirmwareRevision,
    package_size: usize,
    overrides: HashMap<u8, Frame>,
    counter: u8,
    syncs_seen: u32,
    synced: bool,
    /// Packet indices the host asked for, in order
    pub requested: Vec<PacketIndex>,
    /// Every frame received from the host
    pub received: Vec<Frame>,
}

impl ScriptedCamera {
    /// Camera holding `image` that acknowledges the first SYNC.
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            image,
            ack_on_sync: 1,
            firmware: FirmwareRevision::default(),
            package_size: PACKAGE_SIZE,
            overrides: HashMap::new(),
            counter: 0,
            syncs_seen: 0,
            synced: false,
            requested: Vec::new(),
            received: Vec::new(),
        }
    }

    /// Acknowledge the `k`-th SYNC; every earlier one is NAKed.
    pub fn ack_on_sync(mut self, k: u32) -> Self {
        self.ack_on_sync = k.max(1);
        self
    }

    /// Firmware revision, which decides the DATA-LENGTH id.
    pub fn firmware(mut self, firmware: FirmwareRevision) -> Self {
        self.firmware = firmware;
        self
    }

    /// Answer `command_id` with `frame` instead of the normal ACK.
    pub fn reply_to(mut self, command_id: u8, frame: Frame) -> Self {
        self.overrides.insert(command_id, frame);
        self
    }

    /// Reported picture size.
    pub fn image_size(&self) -> ImageSize {
        ImageSize::new(self.image.len() as u32)
    }

    /// SYNC frames received up to and including the acknowledged one.
    pub fn syncs_seen(&self) -> u32 {
        self.syncs_seen
    }

    /// Bytes the camera puts on the wire in answer to `frame`.
    pub fn respond(&mut self, frame: &Frame) -> Vec<u8> {
        self.received.push(*frame);
        let id = frame.id();
        if let Some(over) = self.overrides.get(&id) {
            return over.as_bytes().to_vec();
        }
        match id {
            CMD_SYNC => self.on_sync(),
            CMD_ACK => self.on_ack(frame),
            CMD_SET_PACKAGE_SIZE => {
                let [_, lo, hi, _] = frame.params();
                self.package_size = usize::from(u16::from_le_bytes([lo, hi])).max(1);
                self.ack(id)
            }
            CMD_INITIAL | CMD_SNAPSHOT => self.ack(id),
            CMD_GET_PICTURE => {
                let mut out = self.ack(id);
                let length = data_length_frame(self.firmware.data_length_id(), self.image_size());
                out.extend_from_slice(length.as_bytes());
                out
            }
            _ => nak_frame(self.next_counter(), 0x03).as_bytes().to_vec(),
        }
    }

    /// Answer frames read from `transport` until the host goes quiet or
    /// hangs up.
    pub fn serve<T: ByteTransport>(&mut self, mut transport: T) -> Result<()> {
        let mut buf = [0u8; FRAME_LEN];
        loop {
            match transport.receive_exact(&mut buf) {
                Ok(()) => {}
                Err(Error::Timeout) | Err(Error::Disconnected) => return Ok(()),
                Err(e) => return Err(e),
            }
            let reply = self.respond(&Frame::from_bytes(buf));
            match transport.send_all(&reply) {
                Ok(()) => {}
                Err(Error::Disconnected) => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }

    fn on_sync(&mut self) -> Vec<u8> {
        if self.synced {
            return Vec::new();
        }
        self.syncs_seen += 1;
        if self.syncs_seen < self.ack_on_sync {
            return nak_frame(self.next_counter(), 0x01).as_bytes().to_vec();
        }
        self.synced = true;
        let mut out = self.ack(CMD_SYNC);
        out.extend_from_slice(camera_sync_frame().as_bytes());
        out
    }

    fn on_ack(&mut self, frame: &Frame) -> Vec<u8> {
        let Ok(index) = decode_custom_ack(frame) else {
            return Vec::new();
        };
        self.requested.push(index);
        let start = usize::from(index.as_u16()) * self.package_size;
        let end = (start + self.package_size).min(self.image.len());
        debug!("scripted camera: {} -> bytes {}..{}", index, start, end);
        if start >= end {
            return Vec::new();
        }
        self.image[start..end].to_vec()
    }

    fn ack(&mut self, command_id: u8) -> Vec<u8> {
        let counter = self.next_counter();
        ack_frame(command_id, counter).as_bytes().to_vec()
    }

    fn next_counter(&mut self) -> u8 {
        let c = self.counter;
        self.counter = self.counter.wrapping_add(1);
        c
    }
}

/// Responder sharing `camera` with the test, which can inspect it afterwards.
#[doc(hidden)]
pub fn shared_responder(
    camera: &Rc<RefCell<ScriptedCamera>>,
) -> impl FnMut(&Frame) -> Vec<u8> + 'static {
    let camera = Rc::clone(camera);
    move |frame| camera.borrow_mut().respond(frame)
}
