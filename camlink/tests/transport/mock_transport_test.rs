use camlink::camera::Camera;
use camlink::transport::MockTransport;
use camlink::{ByteTransport, Error};

use super::common::fixtures;

#[test]
fn scripted_bytes_then_timeout() {
    let mut mock = MockTransport::new();
    mock.push_frame(fixtures::sync_ack_frame());
    let mut camera = Camera::new(mock);
    assert_eq!(camera.receive_frame().unwrap(), fixtures::sync_ack_frame());
    assert!(matches!(camera.receive_frame(), Err(Error::Timeout)));
}

#[test]
fn responder_answers_each_frame() {
    let mut camera = Camera::new(MockTransport::with_responder(|f| {
        let mut reply = f.as_bytes().to_vec();
        reply[1] = 0x0E;
        reply
    }));
    let reply = camera.exchange(&camlink::Command::Sync).unwrap();
    assert_eq!(reply, fixtures::frame("aa 0e 00 00 00 00"));
}

#[test]
fn boxed_transport_forwards() {
    let mut boxed: Box<dyn ByteTransport> = Box::new(MockTransport::new());
    boxed.send_all(&[1, 2, 3]).unwrap();
    assert!(!boxed.rx_ready().unwrap());
    assert!(matches!(boxed.receive_byte(), Err(Error::Timeout)));
}
