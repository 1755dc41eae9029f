use camlink::constants::CMD_INITIAL;
use camlink::test_support::{ScriptedCamera, sample_image};
use camlink::transfer::TransferState;
use camlink::{
    CaptureConfig, CaptureSession, CountingReset, ImageTransfer, ManualTimer, MemorySink,
    PacketCountMode, PacketIndex, RecordingDisplay, SectorAddress, Step, TransferConfig,
};

use super::common::{fixtures, helpers};

#[test]
fn picture_of_1300_bytes_lands_in_three_sectors() {
    helpers::init_logging();
    let image = sample_image(1300);
    let (cam, mut camera) = helpers::scripted_camera(ScriptedCamera::new(image.clone()));
    let mut config = CaptureConfig::default();
    config.transfer.packet_count = PacketCountMode::RoundUp;
    let mut session = CaptureSession::new(
        config,
        CountingReset::new(),
        ManualTimer::new(),
        MemorySink::new(),
        RecordingDisplay::new(),
    )
    .unwrap();

    let report = session.run(&mut camera).unwrap();
    assert_eq!(report.transfer.payload_lengths, vec![512, 512, 276]);
    assert_eq!(
        report.transfer.sectors_written,
        vec![
            SectorAddress::new(0),
            SectorAddress::new(1),
            SectorAddress::new(2)
        ]
    );
    // Nothing is requested after the third sector is written.
    assert_eq!(
        cam.borrow().requested,
        vec![PacketIndex::new(0), PacketIndex::new(1), PacketIndex::new(2)]
    );
    let last = camera.transport().sent_frames();
    assert_eq!(last.last().map(|f| f.params()), Some([0x00, 0x00, 0x02, 0x00]));

    let sink = session.sink();
    assert_eq!(&sink.sector(2).unwrap()[..276], &image[1024..]);
    assert!(sink.sector(2).unwrap()[276..].iter().all(|&b| b == 0));
    assert!(sink.sector(3).is_none());
    assert!(!sink.has_unflushed_writes());
}

#[test]
fn default_mode_truncates_partial_packet() {
    let (_, mut camera) = helpers::scripted_camera(ScriptedCamera::new(sample_image(1300)));
    let mut sink = MemorySink::new();
    let mut transfer = ImageTransfer::new(TransferConfig::default()).unwrap();
    let report = transfer.run(&mut camera, &mut sink).unwrap();
    assert_eq!(report.payload_lengths, vec![512, 512]);
    assert_eq!(sink.written_sectors(), vec![0, 1]);
}

#[test]
fn wrong_initial_ack_never_reaches_package_size() {
    let (cam, mut camera) = helpers::scripted_camera(
        ScriptedCamera::new(sample_image(1300)).reply_to(CMD_INITIAL, fixtures::bad_initial_ack()),
    );
    let mut transfer = ImageTransfer::new(TransferConfig::default()).unwrap();
    let err = transfer.run(&mut camera, &mut MemorySink::new()).unwrap_err();
    assert_eq!(err.step(), Some(Step::ImageParameters));
    assert_eq!(transfer.state(), TransferState::Halted(Step::ImageParameters));
    assert_eq!(
        camera.transport().count_sent(fixtures::package_size_frame()),
        0
    );
    assert_eq!(cam.borrow().received, vec![fixtures::initial_frame()]);
}

#[test]
fn smaller_package_size_splits_sectors() {
    let image = sample_image(700);
    let (_, mut camera) = helpers::scripted_camera(ScriptedCamera::new(image.clone()));
    let mut sink = MemorySink::new();
    let mut transfer = ImageTransfer::new(TransferConfig {
        package_size: 256,
        packet_count: PacketCountMode::RoundUp,
        ..TransferConfig::default()
    })
    .unwrap();
    let report = transfer.run(&mut camera, &mut sink).unwrap();
    assert_eq!(report.payload_lengths, vec![256, 256, 188]);
    assert_eq!(&sink.sector(1).unwrap()[..256], &image[256..512]);
    assert!(sink.sector(1).unwrap()[256..].iter().all(|&b| b == 0));
}
