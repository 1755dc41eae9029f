// fixtures.rs: frames and payloads used across the integration tests

use camlink::protocol::Frame;

/// Decode a hex fixture into a frame; panics on malformed input.
pub fn frame(hex_str: &str) -> Frame {
    let bytes = hex::decode(hex_str.replace(' ', "")).expect("valid hex fixture");
    Frame::try_from(bytes.as_slice()).expect("six-byte fixture")
}

pub fn sync_frame() -> Frame {
    frame("aa 0d 00 00 00 00")
}

pub fn sync_ack_frame() -> Frame {
    frame("aa 0e 0d 00 00 00")
}

pub fn initial_frame() -> Frame {
    frame("aa 01 00 03 03 05")
}

pub fn package_size_frame() -> Frame {
    frame("aa 06 08 00 02 00")
}

pub fn snapshot_frame() -> Frame {
    frame("aa 05 01 00 00 00")
}

pub fn get_picture_frame() -> Frame {
    frame("aa 04 02 00 00 00")
}

/// Camera reply to SET-INITIAL-PARAMS with the wrong echoed id.
pub fn bad_initial_ack() -> Frame {
    frame("aa 0e 02 00 00 00")
}

/// DATA-LENGTH for 1300 bytes (0x000514) from firmware revision A.
pub fn data_length_1300() -> Frame {
    frame("aa 0a 01 14 05 00")
}

/// Reply bytes of the LCD bridge for a successful three-byte command.
pub const LCD_OK3: [u8; 3] = [0x06, 0x00, 0x01];

/// Reply byte of the LCD bridge for a successful one-byte command.
pub const LCD_OK1: [u8; 1] = [0x06];
