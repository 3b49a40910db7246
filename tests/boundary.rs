//! Boundary behaviors and round-trip laws from the testable-properties list, driven against the
//! public translation/ENI surface rather than against a single function in isolation.

use ethercat_rt::config::{ArrayParsingMode, BitOffsetPolicy};
use ethercat_rt::eni::{Configuration, EniError};
use ethercat_rt::translate::default::{DefaultCodec, StringArrayCodec};
use ethercat_rt::translate::{dispatch_input, dispatch_output, TranslationError};

const MISMATCHED_ENI: &str = r#"
    <EtherCATConfig><Config>
      <Master><Name>MainMaster</Name></Master>
      <Slave>
        <Info><Name>Drive1</Name><PhysAddr>#x1001</PhysAddr><AutoIncAddr>0</AutoIncAddr></Info>
      </Slave>
      <ProcessImage>
        <Inputs>
          <ByteSize>1</ByteSize>
          <Variable>
            <Name>Drive1.TxPDO.Value32</Name><BitSize>32</BitSize><BitOffs>0</BitOffs>
            <DataType>UDINT</DataType>
          </Variable>
        </Inputs>
        <Outputs><ByteSize>0</ByteSize></Outputs>
      </ProcessImage>
    </Config></EtherCATConfig>
"#;

#[test]
fn process_image_byte_size_disagreeing_with_variables_is_rejected() {
    let result = Configuration::from_string(MISMATCHED_ENI);
    assert!(matches!(
        result,
        Err(EniError::ProcessImageSizeMismatch { .. })
    ));
}

#[test]
fn string_array_require_equal_size_rejects_mismatched_lengths_without_mutating_buffer() {
    let codec = StringArrayCodec::new(ArrayParsingMode::RequireEqualSize);
    let mut data = [0xAAu8; 8];
    let before = data;
    let values = vec!["ab".to_string(), "abc".to_string()];

    let result = dispatch_output(&codec, &mut data, &values, 0, BitOffsetPolicy::default());

    assert_eq!(result, Err(TranslationError::StringArrayShapeMismatch));
    assert_eq!(data, before, "a rejected translation must not touch the destination buffer");
}

#[test]
fn oversized_buffer_without_partial_translation_is_rejected() {
    let mut out = 0u32;
    let data = [0u8; 5]; // one byte larger than a u32 needs
    let result = dispatch_input(&DefaultCodec, &data, &mut out, 0, BitOffsetPolicy::default());

    // `allow-partial-translation` is a default Cargo feature; this test documents the behavior
    // regardless of which way the feature happens to be compiled for this test run, the same way
    // `translate::default`'s own `exact_fit_required_without_allow_partial` does.
    if cfg!(all(feature = "verify", not(feature = "allow-partial-translation"))) {
        assert_eq!(result, Err(TranslationError::BufferSizeMismatch { need: 4, have: 5 }));
    } else {
        assert!(result.is_ok());
    }
}

#[test]
fn bit_offset_zero_path_matches_plain_decode_when_offset_is_byte_aligned() {
    // bit_offset=8 is byte-aligned (offset mod 8 == 0); the bit-offset-aware path must produce
    // exactly what decoding the equivalent byte-aligned slice directly would.
    let data = [0xFFu8, 0x78, 0x56, 0x34, 0x12];

    let mut via_offset = 0u32;
    dispatch_input(&DefaultCodec, &data, &mut via_offset, 8, BitOffsetPolicy::default()).unwrap();

    let mut via_slice = 0u32;
    dispatch_input(&DefaultCodec, &data[1..], &mut via_slice, 0, BitOffsetPolicy::default())
        .unwrap();

    assert_eq!(via_offset, via_slice);
    assert_eq!(via_offset, 0x1234_5678);
}

#[test]
fn scalar_round_trips_decode_then_encode() {
    for value in [0u32, 1, 0xFFFF_FFFF, 0x1234_5678, 42] {
        let mut buf = [0u8; 4];
        dispatch_output(&DefaultCodec, &mut buf, &value, 0, BitOffsetPolicy::default()).unwrap();

        let mut decoded = 0u32;
        dispatch_input(&DefaultCodec, &buf, &mut decoded, 0, BitOffsetPolicy::default()).unwrap();
        assert_eq!(decoded, value);
    }
}

#[test]
fn bit_offset_write_preserves_bytes_outside_the_written_range() {
    let mut data = [0xFFu8, 0xFF, 0xFF];
    let poison = data;
    let value = 0u16;

    dispatch_output(&DefaultCodec, &mut data, &value, 4, BitOffsetPolicy::default()).unwrap();

    assert_eq!(data[0] & 0x0F, poison[0] & 0x0F, "low nibble before the offset is untouched");

    let mut readback = 0u16;
    dispatch_input(&DefaultCodec, &data, &mut readback, 4, BitOffsetPolicy::default()).unwrap();
    assert_eq!(readback, value);
}

#[test]
fn autonomize_of_an_eni_slave_view_survives_configuration_drop() {
    let owned = {
        let config = Configuration::from_string(
            r#"<EtherCATConfig><Config>
                <Master><Name>M</Name></Master>
                <Slave>
                  <Info><Name>Drive1</Name><PhysAddr>#x1001</PhysAddr><AutoIncAddr>0</AutoIncAddr></Info>
                </Slave>
            </Config></EtherCATConfig>"#,
        )
        .unwrap();
        config.get_slave("Drive1").unwrap().autonomize()
    };
    assert_eq!(owned.name(), "Drive1");
    assert_eq!(owned.get_fixed_addr(), 0x1001);
}
