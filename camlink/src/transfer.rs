// camlink-rs/camlink/src/transfer.rs
//! Picture capture and packetised transfer into sector storage.
//!
//! Four configuration commands are each answered by one ACK frame. Any other
//! reply is fatal. The camera then reports the picture size and the host
//! pulls the picture packet by packet with custom ACKs, writing packet `i`
//! to sector `i`.

use std::thread;

use log::{debug, error, info, warn};

use crate::camera::Camera;
use crate::config::{PacketCountMode, SinkFailurePolicy, TransferConfig};
use crate::constants::SECTOR_SIZE;
use crate::protocol::responses::{ack_for, decode_data_length};
use crate::protocol::{Command, Frame, Reply};
use crate::storage::{Sector, StorageSink};
use crate::transport::ByteTransport;
use crate::types::{ImageSize, PacketIndex, SectorAddress};
use crate::utils::hex_preview;
use crate::{Error, Result, Step};

/// Transfer progress. Every step has an edge to `Halted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    /// Not started
    Idle,
    /// SET-INITIAL-PARAMS sent
    NegotiateParams,
    /// SET-PACKAGE-SIZE sent
    SetPackageSize,
    /// SNAPSHOT sent
    TriggerSnapshot,
    /// GET-PICTURE sent
    RequestPicture,
    /// Waiting for DATA-LENGTH
    LearnSize,
    /// Receiving packet `index`
    TransferLoop {
        /// Packet being received
        index: u32,
    },
    /// Every packet stored
    Done,
    /// Terminal failure in the named step
    Halted(Step),
}

impl TransferState {
    /// Step reported when a run fails in this state.
    fn step(&self) -> Step {
        match self {
            Self::NegotiateParams => Step::ImageParameters,
            Self::SetPackageSize => Step::PackageSize,
            Self::TriggerSnapshot => Step::Snapshot,
            Self::RequestPicture => Step::GetPicture,
            Self::Halted(step) => *step,
            Self::Idle | Self::LearnSize | Self::TransferLoop { .. } | Self::Done => {
                Step::Transferring
            }
        }
    }
}

/// Packet bookkeeping for one picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSession {
    total: ImageSize,
    package_size: u32,
    packet_count: u32,
    index: u32,
    bytes_remaining: i64,
}

impl TransferSession {
    /// Bookkeeping for a picture of `total` bytes. Fails on a zero package
    /// size or more packets than a 16-bit index can address.
    pub fn new(total: ImageSize, package_size: u16, mode: PacketCountMode) -> Result<Self> {
        let package_size = u32::from(package_size);
        if package_size == 0 {
            return Err(Error::UnsupportedOperation("zero package size".into()));
        }
        let bytes = total.as_u32();
        let packet_count = match mode {
            PacketCountMode::Truncate => bytes / package_size,
            PacketCountMode::RoundUp => bytes.div_ceil(package_size),
        };
        // Packet indices travel as u16 in the custom ACK.
        if packet_count > u32::from(u16::MAX) + 1 {
            return Err(Error::UnsupportedOperation(format!(
                "{} needs {} packets, more than a packet index can address",
                total, packet_count
            )));
        }
        Ok(Self {
            total,
            package_size,
            packet_count,
            index: 0,
            bytes_remaining: i64::from(bytes),
        })
    }

    /// Picture size reported by the camera.
    pub fn total(&self) -> ImageSize {
        self.total
    }

    /// Packets that will be requested.
    pub fn packet_count(&self) -> u32 {
        self.packet_count
    }

    /// Next packet to request; also the next sector.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// `total - 512 * index`; negative only past a short final packet.
    pub fn bytes_remaining(&self) -> i64 {
        self.bytes_remaining
    }

    /// Whether every packet has been handled.
    pub fn is_complete(&self) -> bool {
        self.index >= self.packet_count
    }

    /// Index of the next packet, `None` once every packet was taken.
    pub fn packet_index(&self) -> Option<PacketIndex> {
        if self.is_complete() {
            return None;
        }
        u16::try_from(self.index).ok().map(PacketIndex::new)
    }

    /// Payload bytes of the next packet: `min(package size, remaining)`.
    pub fn payload_len(&self) -> usize {
        self.bytes_remaining.clamp(0, i64::from(self.package_size)) as usize
    }

    /// Move to the next packet.
    pub fn advance(&mut self) {
        self.index += 1;
        self.bytes_remaining -= i64::from(self.package_size);
    }
}

/// Outcome of one transfer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Picture size
    pub total: ImageSize,
    /// Packets requested
    pub packet_count: u32,
    /// Payload length of every received packet, in order
    pub payload_lengths: Vec<usize>,
    /// Sectors that stored a packet, in order
    pub sectors_written: Vec<SectorAddress>,
    /// Sectors skipped under `SinkFailurePolicy::Continue`
    pub failed_sectors: Vec<SectorAddress>,
    /// Storage failures seen, retried ones included
    pub sink_failures: u32,
}

impl TransferReport {
    /// Image bytes received over all packets.
    pub fn bytes_received(&self) -> usize {
        self.payload_lengths.iter().sum()
    }
}

/// Image transfer state machine. Owns the packet buffer.
pub struct ImageTransfer {
    config: TransferConfig,
    state: TransferState,
    packet: Sector,
}

impl ImageTransfer {
    /// Validate `config` and start in `Idle`.
    pub fn new(config: TransferConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: TransferState::Idle,
            packet: [0u8; SECTOR_SIZE],
        })
    }

    /// Current state.
    pub fn state(&self) -> TransferState {
        self.state
    }

    /// Configuration in use.
    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Configure the camera, take a picture and stream it into `sink`.
    pub fn run<T, K>(&mut self, camera: &mut Camera<T>, sink: &mut K) -> Result<TransferReport>
    where
        T: ByteTransport,
        K: StorageSink,
    {
        let result = self.run_inner(camera, sink);
        if result.is_err() && !matches!(self.state, TransferState::Halted(_)) {
            self.state = TransferState::Halted(self.state.step());
        }
        result
    }

    fn run_inner<T, K>(&mut self, camera: &mut Camera<T>, sink: &mut K) -> Result<TransferReport>
    where
        T: ByteTransport,
        K: StorageSink,
    {
        self.packet.fill(0);

        let initial = Command::Initial(self.config.initial_params);
        self.configure(camera, TransferState::NegotiateParams, initial)?;
        let package = Command::SetPackageSize(self.config.package_size);
        self.configure(camera, TransferState::SetPackageSize, package)?;
        let snapshot = Command::Snapshot {
            kind: self.config.snapshot_kind,
            skip_frames: 0,
        };
        self.configure(camera, TransferState::TriggerSnapshot, snapshot)?;
        let picture = Command::GetPicture(self.config.picture_kind);
        self.configure(camera, TransferState::RequestPicture, picture)?;

        self.state = TransferState::LearnSize;
        let frame = camera.receive_frame()?;
        let id = self.config.firmware.data_length_id();
        let Some(total) = decode_data_length(&frame, id) else {
            return Err(self.halt(Step::Transferring, frame));
        };
        let mut session =
            TransferSession::new(total, self.config.package_size, self.config.packet_count)?;
        info!(
            "transfer: picture is {}, {} packets",
            total,
            session.packet_count()
        );

        let mut report = TransferReport {
            total,
            packet_count: session.packet_count(),
            ..TransferReport::default()
        };

        while let Some(index) = session.packet_index() {
            self.state = TransferState::TransferLoop {
                index: session.index(),
            };
            let len = session.payload_len();
            camera.send_custom_ack(index)?;
            camera.receive_burst(&mut self.packet[..len])?;
            report.payload_lengths.push(len);
            debug!(
                "transfer: {} ({} bytes) {}",
                index,
                len,
                hex_preview(&self.packet[..len], 8)
            );

            let sector = index.sector();
            match self.store(sink, sector, &mut report) {
                Ok(()) => report.sectors_written.push(sector),
                Err(e) if e.is_storage() && self.config.sink_failure == SinkFailurePolicy::Continue => {
                    warn!("transfer: {} skipped: {}", sector, e);
                    report.failed_sectors.push(sector);
                }
                Err(e) => {
                    error!("transfer: {} failed: {}", sector, e);
                    return Err(e);
                }
            }

            session.advance();
            self.packet.fill(0);
        }

        self.state = TransferState::Done;
        info!(
            "transfer: done, {} bytes in {} sectors",
            report.bytes_received(),
            report.sectors_written.len()
        );
        Ok(report)
    }

    /// Send one configuration command and require its ACK.
    fn configure<T: ByteTransport>(
        &mut self,
        camera: &mut Camera<T>,
        state: TransferState,
        cmd: Command,
    ) -> Result<()> {
        self.state = state;
        camera.send_command(&cmd)?;
        if !self.config.settle_delay.is_zero() {
            thread::sleep(self.config.settle_delay);
        }
        let reply = camera.receive_frame()?;
        if ack_for(cmd.command_id()).matches(&reply) {
            return Ok(());
        }
        Err(self.halt(state.step(), reply))
    }

    fn halt(&mut self, step: Step, actual: Frame) -> Error {
        self.state = TransferState::Halted(step);
        match Reply::decode(&actual) {
            Ok(Reply::Nak { error: code, .. }) => {
                error!("{} camera NAK, error {:#04x}", step.fatal_message(), code)
            }
            _ => error!("{} received {}", step.fatal_message(), actual),
        }
        Error::ProtocolViolation { step, actual }
    }

    /// Write the packet buffer to `sector`, applying the retry policy.
    fn store<K: StorageSink>(
        &mut self,
        sink: &mut K,
        sector: SectorAddress,
        report: &mut TransferReport,
    ) -> Result<()> {
        let attempts = match self.config.sink_failure {
            SinkFailurePolicy::Retry { attempts } => u32::from(attempts) + 1,
            _ => 1,
        };
        let mut attempt = 1;
        loop {
            match self.write_packet(sink, sector) {
                Ok(()) => return Ok(()),
                Err(e) if e.is_storage() => {
                    report.sink_failures += 1;
                    if attempt >= attempts {
                        return Err(e);
                    }
                    warn!(
                        "transfer: {} attempt {}/{} failed: {}",
                        sector, attempt, attempts, e
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn write_packet<K: StorageSink>(&mut self, sink: &mut K, sector: SectorAddress) -> Result<()> {
        sink.set_sector_address(sector)?;
        sink.write_sector(&self.packet)?;
        sink.flush()?;
        if self.config.verify_writes {
            let mut back = [0u8; SECTOR_SIZE];
            sink.read_sector(&mut back)?;
            if back != self.packet {
                return Err(Error::VerifyMismatch {
                    sector: sector.as_u32(),
                });
            }
        }
        Ok(())
    }
}
