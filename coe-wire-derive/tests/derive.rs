use coe_wire::{CoeRead, CoeSized, CoeWrite, CoeWireReadWrite};

#[derive(CoeWireReadWrite, Debug, PartialEq)]
struct DriveStatus {
    #[coe(bits = 16)]
    status_word: u16,
    #[coe(bits = 32)]
    actual_position: i32,
}

#[test]
fn round_trip() {
    let status = DriveStatus {
        status_word: 0x1234,
        actual_position: -42,
    };

    let mut buf = [0u8; 6];
    status.write_into(&mut buf);

    assert_eq!(DriveStatus::PACKED_BITS, 48);
    assert_eq!(DriveStatus::read_from(&buf).unwrap(), status);
}
