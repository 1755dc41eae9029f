use std::thread;
use std::time::Duration;

use anyhow::Result;
use camlink::camera::Camera;
use camlink::test_support::ScriptedCamera;
use camlink::transport::ChannelTransport;
use camlink::{
    ByteTransport, CountingReset, Handshake, HandshakeConfig, HandshakeState, MonotonicTimer,
};
use serial_test::serial;

use super::common::helpers;

#[test]
#[serial]
fn stray_byte_at_power_up_does_not_stall_beacon() -> Result<()> {
    helpers::init_logging();
    let (host, mut device) = ChannelTransport::pair();
    let host = host.with_receive_timeout(Duration::from_secs(2));

    let camera_thread = thread::spawn(move || -> camlink::Result<u32> {
        // UART garbage before the camera starts listening.
        device.send_byte(0x00)?;
        let device = device.with_receive_timeout(Duration::from_millis(500));
        let mut cam = ScriptedCamera::new(Vec::new()).ack_on_sync(3);
        cam.serve(device)?;
        Ok(cam.syncs_seen())
    });

    let mut hs = Handshake::new(
        HandshakeConfig::default(),
        CountingReset::new(),
        MonotonicTimer::new(),
    );
    let mut camera = Camera::new(host);
    let report = hs.run(&mut camera)?;
    drop(camera);

    let syncs_seen = camera_thread.join().expect("camera thread panicked")?;
    assert_eq!(hs.state(), HandshakeState::Done);
    assert_eq!(report.discarded, 1);
    assert_eq!(syncs_seen, 3);
    assert!(report.syncs_sent >= 3);
    assert_eq!(report.resets, 1);
    Ok(())
}
