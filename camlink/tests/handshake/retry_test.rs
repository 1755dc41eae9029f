use camlink::camera::Camera;
use camlink::test_support::ScriptedCamera;
use camlink::transport::MockTransport;
use camlink::{
    CountingReset, Error, Handshake, HandshakeConfig, HandshakeState, ManualTimer, Step,
};

use super::common::{fixtures, helpers};

fn run(k: u32, config: HandshakeConfig) -> (Handshake<CountingReset, ManualTimer>, MockTransport, camlink::Result<camlink::HandshakeReport>) {
    helpers::init_logging();
    let (_, mut camera) = helpers::scripted_camera(ScriptedCamera::new(Vec::new()).ack_on_sync(k));
    let mut hs = Handshake::new(config, CountingReset::new(), ManualTimer::new());
    let result = hs.run(&mut camera);
    (hs, camera.into_inner(), result)
}

#[test]
fn sync_count_and_resets_for_each_k() {
    for k in 1..=35u32 {
        let (hs, mock, result) = run(k, HandshakeConfig::default());
        let report = result.unwrap();
        assert_eq!(hs.state(), HandshakeState::Done);
        assert_eq!(report.syncs_sent, k);
        assert_eq!(report.resets, k.div_ceil(10), "k = {}", k);
        assert_eq!(report.failures, k - 1);
        assert_eq!(mock.count_sent(fixtures::sync_frame()), k as usize);
        assert_eq!(mock.sent_frames().last(), Some(&fixtures::sync_ack_frame()));
    }
}

#[test]
fn custom_threshold_changes_escalation() {
    let config = HandshakeConfig {
        reset_threshold: 3,
        ..HandshakeConfig::default()
    };
    let (hs, _, result) = run(7, config);
    let report = result.unwrap();
    // Failures 3 and 6 escalate.
    assert_eq!(report.resets, 3);
    assert_eq!(hs.reset_line().pulses, 3);
}

#[test]
fn identical_scripts_give_identical_wire_traffic() {
    let (_, first, _) = run(13, HandshakeConfig::default());
    let (_, second, _) = run(13, HandshakeConfig::default());
    assert_eq!(first.sent, second.sent);
}

#[test]
fn limit_is_reported_as_exhausted() {
    let config = HandshakeConfig {
        sync_attempt_limit: Some(12),
        ..HandshakeConfig::default()
    };
    let (hs, mock, result) = run(20, config);
    match result {
        Err(Error::SyncExhausted { attempts }) => assert_eq!(attempts, 12),
        other => panic!("expected exhaustion, got: {:?}", other),
    }
    assert_eq!(hs.state(), HandshakeState::Halted);
    assert_eq!(mock.count_sent(fixtures::sync_ack_frame()), 0);
}

#[test]
fn corrupted_camera_sync_is_fatal() {
    let mock = MockTransport::with_responder(|f| {
        if *f == fixtures::sync_frame() {
            let mut out = fixtures::frame("aa 0e 0d 00 00 00").as_bytes().to_vec();
            out.extend_from_slice(fixtures::frame("aa 0d 00 00 00 01").as_bytes());
            out
        } else {
            Vec::new()
        }
    });
    let mut camera = Camera::new(mock);
    let mut hs = Handshake::new(
        HandshakeConfig::default(),
        CountingReset::new(),
        ManualTimer::new(),
    );
    let err = hs.run(&mut camera).unwrap_err();
    assert_eq!(err.step(), Some(Step::Sync));
    assert!(err.to_string().starts_with("Sync has gone wrong."));
    assert_eq!(hs.state(), HandshakeState::Halted);
}
