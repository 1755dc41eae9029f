use std::thread;
use std::time::Duration;

use anyhow::Result;
use camlink::camera::Camera;
use camlink::test_support::{ScriptedCamera, sample_image};
use camlink::transport::ChannelTransport;
use camlink::{
    ByteTransport, CaptureConfig, CaptureSession, CountingReset, Error, MemorySink, MonotonicTimer,
    PacketCountMode, RecordingDisplay,
};
use serial_test::serial;

use super::common::helpers;

#[test]
#[serial]
fn capture_against_camera_thread() -> Result<()> {
    helpers::init_logging();
    let (host, device) = ChannelTransport::pair();
    let host = host.with_receive_timeout(Duration::from_secs(5));
    let device = device.with_receive_timeout(Duration::from_millis(500));

    let image = sample_image(3000);
    let expected = image.clone();
    let camera_thread = thread::spawn(move || {
        let mut cam = ScriptedCamera::new(image).ack_on_sync(3);
        cam.serve(device).map(|_| cam.requested.len())
    });

    let mut config = CaptureConfig::default();
    config.transfer.packet_count = PacketCountMode::RoundUp;
    let mut session = CaptureSession::new(
        config,
        CountingReset::new(),
        MonotonicTimer::new(),
        MemorySink::new(),
        RecordingDisplay::new(),
    )?;
    let mut camera = Camera::new(host);
    let report = session.run(&mut camera)?;
    drop(camera);

    let requested = camera_thread.join().expect("camera thread panicked")?;
    assert_eq!(requested, 6);
    // The beacon keeps running while the camera thread answers, so late
    // SYNC frames are possible.
    assert!(report.handshake.syncs_sent >= 3);
    assert_eq!(report.transfer.bytes_received(), 3000);
    assert_eq!(&session.sink().contents()[..3000], &expected[..]);
    Ok(())
}

#[test]
#[serial]
fn silent_peer_times_out() {
    let (host, _device) = ChannelTransport::pair();
    let mut host = host.with_receive_timeout(Duration::from_millis(20));
    assert!(!host.rx_ready().unwrap());
    assert!(matches!(host.receive_byte(), Err(Error::Timeout)));
}

#[test]
fn dropped_peer_disconnects() {
    let (mut host, device) = ChannelTransport::pair();
    drop(device);
    assert!(matches!(host.send_byte(0xAA), Err(Error::Disconnected)));
    assert!(matches!(host.receive_byte(), Err(Error::Disconnected)));
}
