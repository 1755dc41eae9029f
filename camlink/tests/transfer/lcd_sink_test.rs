use std::cell::RefCell;
use std::rc::Rc;

use camlink::storage::LcdBridge;
use camlink::test_support::{ScriptedCamera, sample_image};
use camlink::transport::MockTransport;
use camlink::{
    CaptureConfig, CaptureSession, CountingReset, Error, ManualTimer, StorageOp,
};

use super::common::fixtures::{LCD_OK1, LCD_OK3};
use super::common::helpers;

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Replies for a capture of `packets` packets with every status line shown.
fn bridge_replies(packets: usize) -> Vec<u8> {
    let mut r = Vec::new();
    r.extend_from_slice(&LCD_OK1); // clear
    r.extend_from_slice(&LCD_OK3); // "Setting up camera..."
    r.extend_from_slice(&LCD_OK3); // media init
    r.extend_from_slice(&LCD_OK3); // "Syncing..."
    r.extend_from_slice(&LCD_OK3); // "Done setting up camera..."
    r.extend_from_slice(&LCD_OK3); // "Taking photo..."
    for _ in 0..packets {
        r.extend_from_slice(&LCD_OK1);
        r.extend_from_slice(&LCD_OK3);
        r.extend_from_slice(&LCD_OK3);
    }
    r.extend_from_slice(&LCD_OK3); // "Done taking photo..."
    r
}

#[test]
fn one_bridge_serves_as_display_and_storage() {
    helpers::init_logging();
    let mut mock = MockTransport::new();
    mock.push_bytes(&bridge_replies(2));
    let lcd = Rc::new(RefCell::new(LcdBridge::new(mock)));

    let image = sample_image(1024);
    let (_, mut camera) = helpers::scripted_camera(ScriptedCamera::new(image.clone()));
    let mut session = CaptureSession::new(
        CaptureConfig::default(),
        CountingReset::new(),
        ManualTimer::new(),
        Rc::clone(&lcd),
        Rc::clone(&lcd),
    )
    .unwrap();
    let report = session.run(&mut camera).unwrap();
    assert_eq!(report.transfer.sectors_written.len(), 2);
    drop(session);

    let lcd = lcd.borrow();
    let sent = &lcd.transport().sent;
    assert!(lcd.transport().incoming.is_empty());
    assert!(contains(sent, &[0xFF, 0x89]));
    assert!(contains(sent, &[0xFF, 0x92, 0x00, 0x00, 0x00, 0x00, 0x00, 0x17]));
    assert!(contains(sent, &[0xFF, 0x92, 0x00, 0x00, 0x00, 0x01, 0x00, 0x17]));
    assert!(contains(sent, &image[512..]));

    let mut done = b"Done taking photo...".to_vec();
    done.push(0);
    assert!(sent.ends_with(&done));
}

#[test]
fn failed_write_aborts_capture() {
    let mut replies = bridge_replies(0);
    // Drop the final status line and fail the first sector write.
    replies.truncate(replies.len() - LCD_OK3.len());
    replies.extend_from_slice(&LCD_OK1);
    replies.extend_from_slice(&[0x06, 0x00, 0x00]);
    let mut mock = MockTransport::new();
    mock.push_bytes(&replies);
    let lcd = Rc::new(RefCell::new(LcdBridge::new(mock)));

    let (cam, mut camera) = helpers::scripted_camera(ScriptedCamera::new(sample_image(2048)));
    let mut session = CaptureSession::new(
        CaptureConfig::default(),
        CountingReset::new(),
        ManualTimer::new(),
        Rc::clone(&lcd),
        Rc::clone(&lcd),
    )
    .unwrap();
    match session.run(&mut camera) {
        Err(Error::StorageAck {
            op: StorageOp::WriteSector,
            ..
        }) => {}
        other => panic!("expected write failure, got: {:?}", other),
    }
    assert_eq!(cam.borrow().requested.len(), 1);
}

#[test]
fn missing_card_is_reported_before_camera_traffic() {
    let mut mock = MockTransport::new();
    mock.push_bytes(&LCD_OK1);
    mock.push_bytes(&LCD_OK3);
    mock.push_bytes(&[0x06, 0x00, 0x00]);
    let lcd = Rc::new(RefCell::new(LcdBridge::new(mock)));
    let (_, mut camera) = helpers::scripted_camera(ScriptedCamera::new(sample_image(512)));
    let mut session = CaptureSession::new(
        CaptureConfig::default(),
        CountingReset::new(),
        ManualTimer::new(),
        Rc::clone(&lcd),
        Rc::clone(&lcd),
    )
    .unwrap();
    assert!(matches!(session.run(&mut camera), Err(Error::MediaNotPresent)));
    assert!(camera.transport().sent.is_empty());
}
