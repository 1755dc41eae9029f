//! Hex formatting for frames and packet previews in logs and errors.

use std::fmt::Write;

/// Lowercase hex without separators: `&[0xaa, 0x0d]` -> `"aa0d"`.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{:02x}", b);
        s
    })
}

/// Lowercase hex with one space between bytes: `&[0xaa, 0x0d]` -> `"aa 0d"`.
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i != 0 {
            s.push(' ');
        }
        let _ = write!(s, "{:02x}", b);
    }
    s
}

/// Spaced hex of at most `max` bytes, with the elided count appended.
/// Packet payloads are 512 bytes, far too long for a log line.
pub fn hex_preview(bytes: &[u8], max: usize) -> String {
    if bytes.len() <= max {
        return bytes_to_hex_spaced(bytes);
    }
    format!(
        "{} .. (+{} bytes)",
        bytes_to_hex_spaced(&bytes[..max]),
        bytes.len() - max
    )
}
