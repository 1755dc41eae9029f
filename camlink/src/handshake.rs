// camlink-rs/camlink/src/handshake.rs
//! SYNC/ACK rendezvous with the camera.
//!
//! Camera and host power up independently, so the host pulses the camera's
//! reset line and then beacons SYNC frames on a timer until the camera
//! acknowledges one. Every reply that is not that acknowledgement counts as
//! a failure; enough consecutive failures trigger another reset and a
//! slightly slower beacon. Once acknowledged, the camera sends its own SYNC,
//! which must match exactly, and the host acknowledges it.
//!
//! Replies are assembled from bytes that are already waiting, so the beacon
//! keeps running while a frame is only partly received.

use std::time::Duration;

use log::{debug, info, warn};

use crate::camera::Camera;
use crate::camera::reset::ResetLine;
use crate::config::HandshakeConfig;
use crate::constants::{CMD_SYNC, FRAME_LEN, FRAME_SENTINEL};
use crate::protocol::{Frame, Reply};
use crate::protocol::responses::{CAMERA_SYNC, ack_for};
use crate::timer::{SyncBeacon, TimerService};
use crate::transport::ByteTransport;
use crate::{Error, Result, Step};

/// Handshake progress, observable between and after runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Reset pulsed, beacon not yet started
    SendingSync,
    /// Beaconing SYNC, waiting for the camera to acknowledge one
    WaitCameraAck,
    /// Acknowledged, waiting for the camera's SYNC
    WaitCameraSync,
    /// Acknowledging the camera's SYNC
    SendOwnAck,
    /// Rendezvous complete
    Done,
    /// Terminal failure; the handshake must be run again from the start
    Halted,
}

/// Statistics of one handshake run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeReport {
    /// SYNC frames sent, including the acknowledged one
    pub syncs_sent: u32,
    /// Reset pulses, including the one on entry
    pub resets: u32,
    /// Replies that were not the SYNC acknowledgement
    pub failures: u32,
    /// Beacon period in effect when the camera answered
    pub final_interval: Duration,
    /// Line noise dropped while waiting for a frame sentinel
    pub discarded: u32,
}

impl HandshakeReport {
    fn new(interval: Duration) -> Self {
        Self {
            syncs_sent: 0,
            resets: 0,
            failures: 0,
            final_interval: interval,
            discarded: 0,
        }
    }
}

/// Builds the next reply frame out of bytes that are already waiting, so
/// the beacon keeps being serviced while a frame is only partly received.
#[derive(Debug, Default)]
struct FrameAssembler {
    buf: [u8; FRAME_LEN],
    filled: usize,
}

impl FrameAssembler {
    /// Drain waiting bytes until a frame completes or the line goes idle.
    /// A frame only starts on the sentinel; anything before it is dropped
    /// and counted in `discarded`.
    fn pump<T: ByteTransport>(
        &mut self,
        camera: &mut Camera<T>,
        discarded: &mut u32,
    ) -> Result<Option<Frame>> {
        while camera.rx_ready()? {
            let byte = camera.receive_byte()?;
            if self.filled == 0 && byte != FRAME_SENTINEL {
                *discarded += 1;
                debug!("handshake: dropping stray byte {:#04x}", byte);
                continue;
            }
            self.buf[self.filled] = byte;
            self.filled += 1;
            if self.filled == FRAME_LEN {
                self.filled = 0;
                return Ok(Some(Frame::from_bytes(self.buf)));
            }
        }
        Ok(None)
    }
}

/// Handshake driver. Owns the reset line and the timer service; borrows the
/// camera link per run.
pub struct Handshake<R, S> {
    config: HandshakeConfig,
    reset: R,
    timer: S,
    state: HandshakeState,
}

impl<R: ResetLine, S: TimerService> Handshake<R, S> {
    /// Driver that starts in `SendingSync`.
    pub fn new(config: HandshakeConfig, reset: R, timer: S) -> Self {
        Self {
            config,
            reset,
            timer,
            state: HandshakeState::SendingSync,
        }
    }

    /// Current state.
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Configuration in use.
    pub fn config(&self) -> &HandshakeConfig {
        &self.config
    }

    /// Reset line, e.g. to inspect pulse counts.
    pub fn reset_line(&self) -> &R {
        &self.reset
    }

    /// Timer service.
    pub fn timer(&self) -> &S {
        &self.timer
    }

    /// Run the handshake to completion. Every run starts from a fresh state,
    /// so repeating it after `Done` behaves exactly like the first run.
    pub fn run<T: ByteTransport>(&mut self, camera: &mut Camera<T>) -> Result<HandshakeReport> {
        let result = self.run_inner(camera);
        self.timer.stop();
        if result.is_err() {
            self.state = HandshakeState::Halted;
        }
        result
    }

    fn run_inner<T: ByteTransport>(&mut self, camera: &mut Camera<T>) -> Result<HandshakeReport> {
        self.state = HandshakeState::SendingSync;
        let mut interval = self.config.initial_sync_interval;
        let mut report = HandshakeReport::new(interval);
        let beacon = SyncBeacon::new();
        let threshold = self.config.reset_threshold.max(1);
        let mut consecutive = 0u32;
        let mut assembler = FrameAssembler::default();

        info!("handshake: resetting camera");
        self.reset.pulse()?;
        report.resets += 1;
        self.timer.start(interval, beacon.callback());
        self.state = HandshakeState::WaitCameraAck;

        loop {
            self.timer.poll();
            for _ in 0..beacon.take() {
                if let Some(limit) = self.config.sync_attempt_limit {
                    if report.syncs_sent >= limit {
                        warn!("handshake: no SYNC acknowledgement after {} attempts", limit);
                        return Err(Error::SyncExhausted {
                            attempts: report.syncs_sent,
                        });
                    }
                }
                camera.send_sync()?;
                report.syncs_sent += 1;
            }

            let Some(frame) = assembler.pump(camera, &mut report.discarded)? else {
                continue;
            };
            if ack_for(CMD_SYNC).matches(&frame) {
                break;
            }

            report.failures += 1;
            consecutive += 1;
            debug!(
                "handshake: unexpected reply {} ({}/{}) {:?}",
                frame,
                consecutive,
                threshold,
                Reply::decode(&frame).ok()
            );
            if consecutive >= threshold {
                self.timer.stop();
                interval += self.config.sync_interval_step;
                warn!(
                    "handshake: {} bad replies, resetting camera (beacon {:?})",
                    consecutive, interval
                );
                self.reset.pulse()?;
                report.resets += 1;
                consecutive = 0;
                self.timer.start(interval, beacon.callback());
            }
        }

        self.timer.stop();
        // A SYNC requested between the acknowledgement and the stop is dropped.
        beacon.take();
        report.final_interval = interval;

        self.state = HandshakeState::WaitCameraSync;
        let frame = camera.receive_frame()?;
        if !CAMERA_SYNC.matches(&frame) {
            return Err(Error::ProtocolViolation {
                step: Step::Sync,
                actual: frame,
            });
        }

        self.state = HandshakeState::SendOwnAck;
        camera.send_ack()?;
        self.state = HandshakeState::Done;
        info!(
            "handshake: done after {} SYNC frames and {} resets",
            report.syncs_sent, report.resets
        );
        Ok(report)
    }
}
