use camlink::ImageSize;
use camlink::constants::CMD_SYNC;
use camlink::protocol::Reply;
use camlink::protocol::responses::{CAMERA_SYNC, ack_for, decode_data_length};

use super::common::fixtures;

#[test]
fn sync_ack_pattern_ignores_counter_only() {
    let pattern = ack_for(CMD_SYNC);
    assert!(pattern.matches(&fixtures::frame("aa 0e 0d 00 00 00")));
    assert!(pattern.matches(&fixtures::frame("aa 0e 0d 3c 00 00")));
    assert_eq!(pattern.first_mismatch(&fixtures::frame("aa 0e 0c 00 00 00")), Some(2));
    assert_eq!(pattern.first_mismatch(&fixtures::frame("aa 0e 0d 00 01 00")), Some(4));
    assert_eq!(pattern.first_mismatch(&fixtures::frame("ab 0e 0d 00 00 00")), Some(0));
}

#[test]
fn camera_sync_must_be_exact() {
    assert!(CAMERA_SYNC.matches(&fixtures::sync_frame()));
    assert_eq!(CAMERA_SYNC.first_mismatch(&fixtures::frame("aa 0d 00 01 00 00")), Some(3));
}

#[test]
fn data_length_fixture_decodes() {
    let f = fixtures::data_length_1300();
    assert_eq!(decode_data_length(&f, 0x01), Some(ImageSize::new(1300)));
    assert_eq!(decode_data_length(&f, 0x02), None);
    match Reply::decode(&f).unwrap() {
        Reply::DataLength { kind, size } => {
            assert_eq!(kind, 0x01);
            assert_eq!(size.as_u32(), 1300);
        }
        other => panic!("expected data length, got: {:?}", other),
    }
}

#[test]
fn data_length_uses_all_three_size_bytes() {
    let f = fixtures::frame("aa 0a 01 01 02 03");
    assert_eq!(decode_data_length(&f, 0x01), Some(ImageSize::new(0x030201)));
}

#[test]
fn wrong_initial_ack_does_not_match() {
    assert!(!ack_for(0x01).matches(&fixtures::bad_initial_ack()));
}
