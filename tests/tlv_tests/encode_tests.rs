//! Tests for the primitive encoders
//!
//! These tests verify:
//! - Exact byte layout of each element kind
//! - Truncation of oversized values
//! - Rejection of bad widths, tags and payload lengths

use bytes::BytesMut;
use smartlamp::tlv::{
    control_byte, encode_bytes, encode_uint, put_bytes, put_uint, split_control, Width,
};
use smartlamp::LampError;

// =============================================================================
// Unsigned Integer Tests
// =============================================================================

#[test]
fn test_uint_one_byte_layout() {
    assert_eq!(encode_uint(0, 0, 1).unwrap(), vec![0x04, 0x01, 0x00]);
    assert_eq!(encode_uint(2, 0x01, 1).unwrap(), vec![0x44, 0x01, 0x01]);
    assert_eq!(encode_uint(7, 0xAB, 1).unwrap(), vec![0xE4, 0x01, 0xAB]);
}

#[test]
fn test_uint_one_byte_always_carries_length_one() {
    for value in [0u32, 1, 127, 255] {
        let encoded = encode_uint(3, value, 1).unwrap();
        assert_eq!(encoded.len(), 3);
        assert_eq!(encoded[1], 0x01);
    }
}

#[test]
fn test_uint_two_byte_layout_little_endian() {
    assert_eq!(encode_uint(1, 0x0006, 2).unwrap(), vec![0x25, 0x06, 0x00]);
    assert_eq!(encode_uint(4, 0x4001, 2).unwrap(), vec![0x85, 0x01, 0x40]);
    assert_eq!(encode_uint(5, 0xFFFF, 2).unwrap(), vec![0xA5, 0xFF, 0xFF]);
}

#[test]
fn test_uint_truncates_to_width() {
    assert_eq!(encode_uint(0, 0x1FF, 1).unwrap(), vec![0x04, 0x01, 0xFF]);
    assert_eq!(encode_uint(0, 0x1_2345, 2).unwrap(), vec![0x05, 0x45, 0x23]);
}

#[test]
fn test_uint_rejects_bad_width() {
    for width in [0usize, 3, 4, 8] {
        let err = encode_uint(0, 1, width).unwrap_err();
        assert!(matches!(err, LampError::InvalidArgument(_)));
    }
}

#[test]
fn test_uint_rejects_tag_above_seven() {
    let err = encode_uint(8, 1, 1).unwrap_err();
    assert!(matches!(err, LampError::InvalidArgument(_)));
    assert!(err.to_string().contains("tag"));
}

// =============================================================================
// Byte Array Tests
// =============================================================================

#[test]
fn test_bytes_layout() {
    assert_eq!(
        encode_bytes(2, &[0x06, 0x00, 0x08, 0x00]).unwrap(),
        vec![0x50, 0x04, 0x06, 0x00, 0x08, 0x00]
    );
    assert_eq!(encode_bytes(4, &[]).unwrap(), vec![0x90, 0x00]);
}

#[test]
fn test_bytes_max_length_accepted() {
    let data = vec![0xAA; 255];
    let encoded = encode_bytes(6, &data).unwrap();
    assert_eq!(encoded.len(), 257);
    assert_eq!(encoded[0], 0xD0);
    assert_eq!(encoded[1], 255);
    assert_eq!(&encoded[2..], &data[..]);
}

#[test]
fn test_bytes_too_long_rejected() {
    let err = encode_bytes(0, &[0u8; 256]).unwrap_err();
    match err {
        LampError::PayloadTooLarge { len, max } => {
            assert_eq!(len, 256);
            assert_eq!(max, 255);
        }
        other => panic!("Expected PayloadTooLarge, got {:?}", other),
    }
}

#[test]
fn test_put_bytes_writes_nothing_on_error() {
    let mut buf = BytesMut::new();
    put_uint(&mut buf, 0, 0, Width::One).unwrap();
    assert!(put_bytes(&mut buf, 1, &[0u8; 300]).is_err());
    assert_eq!(&buf[..], &[0x04, 0x01, 0x00]);
}

// =============================================================================
// Control Byte Tests
// =============================================================================

#[test]
fn test_control_byte_split() {
    for tag in 0..=7u8 {
        let one = control_byte(tag, Width::One).unwrap();
        let two = control_byte(tag, Width::Two).unwrap();
        assert_eq!(split_control(one), (tag, 0x04));
        assert_eq!(split_control(two), (tag, 0x05));
    }
}

#[test]
fn test_width_from_bytes() {
    assert_eq!(Width::from_bytes(1).unwrap(), Width::One);
    assert_eq!(Width::from_bytes(2).unwrap(), Width::Two);
    assert!(Width::from_bytes(0).is_err());
    assert_eq!(Width::Two.bytes(), 2);
}
