use camlink::PacketIndex;
use camlink::protocol::responses::decode_custom_ack;
use camlink::protocol::{Command, InitialParams, PictureKind, SnapshotKind};
use proptest::prelude::*;

use super::common::fixtures;

#[test]
fn named_commands_match_wire_fixtures() {
    assert_eq!(Command::Sync.to_frame(), fixtures::sync_frame());
    assert_eq!(Command::sync_ack().to_frame(), fixtures::sync_ack_frame());
    assert_eq!(
        Command::Initial(InitialParams::default()).to_frame(),
        fixtures::initial_frame()
    );
    assert_eq!(
        Command::SetPackageSize(512).to_frame(),
        fixtures::package_size_frame()
    );
    assert_eq!(
        Command::Snapshot {
            kind: SnapshotKind::Uncompressed,
            skip_frames: 0
        }
        .to_frame(),
        fixtures::snapshot_frame()
    );
    assert_eq!(
        Command::GetPicture(PictureKind::Raw).to_frame(),
        fixtures::get_picture_frame()
    );
}

#[test]
fn custom_ack_layout_by_branch() {
    for idx in [0u16, 0x7F, 0xFF] {
        let f = Command::custom_ack(PacketIndex::new(idx)).to_frame();
        assert_eq!(f.as_bytes(), &[0xAA, 0x0E, 0x00, 0x00, idx as u8, 0x00]);
    }
    for idx in [0x100u16, 0x1234, 0xFFFF] {
        let f = Command::custom_ack(PacketIndex::new(idx)).to_frame();
        assert_eq!(
            f.as_bytes(),
            &[0xAA, 0x0E, 0x00, 0x00, (idx & 0xFF) as u8, (idx >> 8) as u8]
        );
    }
}

proptest! {
    #[test]
    fn custom_ack_roundtrip(idx in any::<u16>()) {
        let frame = Command::custom_ack(PacketIndex::new(idx)).to_frame();
        prop_assert_eq!(decode_custom_ack(&frame).unwrap().as_u16(), idx);
    }
}
