use std::time::{Duration, Instant};

use camlink::test_support::ScriptedCamera;
use camlink::{CountingReset, Handshake, HandshakeConfig, HandshakeState, MonotonicTimer};
use serial_test::serial;

use super::common::helpers;

#[test]
#[serial]
fn monotonic_timer_paces_sync_beacon() {
    helpers::init_logging();
    let (cam, mut camera) =
        helpers::scripted_camera(ScriptedCamera::new(Vec::new()).ack_on_sync(4));
    let config = HandshakeConfig {
        initial_sync_interval: Duration::from_millis(10),
        ..HandshakeConfig::default()
    };
    let mut hs = Handshake::new(config, CountingReset::new(), MonotonicTimer::new());

    let started = Instant::now();
    let report = hs.run(&mut camera).unwrap();
    let elapsed = started.elapsed();

    assert_eq!(hs.state(), HandshakeState::Done);
    assert_eq!(report.syncs_sent, 4);
    assert_eq!(cam.borrow().syncs_seen(), 4);
    // Four periods must pass before the fourth SYNC goes out.
    assert!(elapsed >= Duration::from_millis(40), "elapsed {:?}", elapsed);
}
