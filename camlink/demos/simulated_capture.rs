//! Full capture against a simulated camera running on another thread.
//!
//! Usage:
//!   RUST_LOG=info cargo run -p camlink --example simulated_capture -- [bytes] [ack_on_sync]

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use camlink::camera::Camera;
use camlink::test_support::{ScriptedCamera, sample_image};
use camlink::transport::ChannelTransport;
use camlink::utils::hex_preview;
use camlink::{
    CaptureConfig, CaptureSession, CountingReset, LogDisplay, MemorySink, MonotonicTimer,
    PacketCountMode,
};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let bytes: usize = match args.next() {
        Some(s) => s.parse().context("image size must be a number")?,
        None => 19_200,
    };
    let ack_on_sync: u32 = match args.next() {
        Some(s) => s.parse().context("SYNC count must be a number")?,
        None => 12,
    };

    let (host, device) = ChannelTransport::pair();
    let host = host.with_receive_timeout(Duration::from_secs(2));
    let device = device.with_receive_timeout(Duration::from_secs(1));

    let camera_thread = thread::spawn(move || {
        let mut cam = ScriptedCamera::new(sample_image(bytes)).ack_on_sync(ack_on_sync);
        cam.serve(device)
    });

    let mut config = CaptureConfig::default();
    config.transfer.packet_count = PacketCountMode::RoundUp;
    let mut session = CaptureSession::new(
        config,
        CountingReset::new(),
        MonotonicTimer::new(),
        MemorySink::new(),
        LogDisplay,
    )?;
    let mut camera = Camera::new(host);
    let report = session.run(&mut camera)?;
    drop(camera);
    camera_thread
        .join()
        .map_err(|_| anyhow::anyhow!("camera thread panicked"))??;

    println!(
        "handshake: {} SYNC frames, {} resets, beacon {:?}",
        report.handshake.syncs_sent, report.handshake.resets, report.handshake.final_interval
    );
    println!(
        "transfer: {} in {} packets, {} sectors written",
        report.transfer.total,
        report.transfer.packet_count,
        report.transfer.sectors_written.len()
    );
    if let Some(first) = session.sink().sector(0) {
        println!("sector 0: {}", hex_preview(first, 16));
    }
    Ok(())
}
