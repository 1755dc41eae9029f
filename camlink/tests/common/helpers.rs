// helpers.rs: wiring shared by the integration tests

use std::cell::RefCell;
use std::rc::Rc;

use camlink::camera::Camera;
use camlink::test_support::{ScriptedCamera, shared_responder};
use camlink::transport::MockTransport;

/// Camera link driven by `camera`, which stays inspectable through the
/// returned handle.
pub fn scripted_camera(
    camera: ScriptedCamera,
) -> (Rc<RefCell<ScriptedCamera>>, Camera<MockTransport>) {
    let shared = Rc::new(RefCell::new(camera));
    let mock = MockTransport::with_responder(shared_responder(&shared));
    (shared, Camera::new(mock))
}

/// Install env_logger once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
