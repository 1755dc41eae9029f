// camlink-rs/camlink/src/session.rs
//! End-to-end capture: media setup, handshake, picture transfer.

use log::{error, info, warn};

use crate::camera::Camera;
use crate::camera::reset::ResetLine;
use crate::config::CaptureConfig;
use crate::display::StatusDisplay;
use crate::handshake::{Handshake, HandshakeReport};
use crate::storage::StorageSink;
use crate::timer::TimerService;
use crate::transfer::{ImageTransfer, TransferReport};
use crate::transport::ByteTransport;
use crate::{Error, Result};

/// Outcome of a successful capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    /// Handshake statistics
    pub handshake: HandshakeReport,
    /// Transfer statistics
    pub transfer: TransferReport,
}

/// One capture run wired to its peripherals.
pub struct CaptureSession<R, S, K, D> {
    config: CaptureConfig,
    handshake: Handshake<R, S>,
    transfer: ImageTransfer,
    sink: K,
    display: D,
}

impl<R, S, K, D> CaptureSession<R, S, K, D>
where
    R: ResetLine,
    S: TimerService,
    K: StorageSink,
    D: StatusDisplay,
{
    /// Wire a session. Fails on an invalid transfer configuration.
    pub fn new(config: CaptureConfig, reset: R, timer: S, sink: K, display: D) -> Result<Self> {
        let transfer = ImageTransfer::new(config.transfer.clone())?;
        let handshake = Handshake::new(config.handshake.clone(), reset, timer);
        Ok(Self {
            config,
            handshake,
            transfer,
            sink,
            display,
        })
    }

    /// Run the capture once. A fatal error is shown on the display before
    /// it is returned; the session must be rebuilt or rerun from scratch.
    pub fn run<T: ByteTransport>(&mut self, camera: &mut Camera<T>) -> Result<CaptureReport> {
        match self.run_inner(camera) {
            Ok(report) => Ok(report),
            Err(e) => {
                self.report_fatal(&e);
                Err(e)
            }
        }
    }

    fn run_inner<T: ByteTransport>(&mut self, camera: &mut Camera<T>) -> Result<CaptureReport> {
        self.clear();
        self.status("Setting up camera...");
        if self.config.media_init {
            self.sink.init()?;
        }
        self.status("Syncing...");
        let handshake = self.handshake.run(camera)?;
        self.status("Done setting up camera...");

        self.status("Taking photo...");
        let transfer = self.transfer.run(camera, &mut self.sink)?;
        self.status("Done taking photo...");

        info!(
            "capture: {} stored in {} sectors after {} SYNC frames",
            transfer.total,
            transfer.sectors_written.len(),
            handshake.syncs_sent
        );
        Ok(CaptureReport {
            handshake,
            transfer,
        })
    }

    fn report_fatal(&mut self, err: &Error) {
        let message = match err.step() {
            Some(step) => step.fatal_message(),
            None => err.to_string(),
        };
        error!("capture: {}", err);
        self.clear();
        self.status(&message);
    }

    /// Display output never decides the outcome of a capture.
    fn status(&mut self, line: &str) {
        if let Err(e) = self.display.write_line(line) {
            warn!("capture: status line {:?} not shown: {}", line, e);
        }
    }

    fn clear(&mut self) {
        if let Err(e) = self.display.clear() {
            warn!("capture: display clear failed: {}", e);
        }
    }

    /// Handshake driver.
    pub fn handshake(&self) -> &Handshake<R, S> {
        &self.handshake
    }

    /// Transfer driver.
    pub fn transfer(&self) -> &ImageTransfer {
        &self.transfer
    }

    /// Storage sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Status display.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Give back the sink and the display.
    pub fn into_parts(self) -> (K, D) {
        (self.sink, self.display)
    }
}
