//! Primitive encoders
//!
//! Each function emits exactly one element. The `put_*` variants append to
//! a buffer and are what the command builders use; `encode_*` return a
//! fresh vector.

use bytes::{BufMut, BytesMut};

use crate::error::{LampError, Result};
use super::control::{bytes_control_byte, control_byte, Width, MAX_BYTES_LEN, UINT_ONE_BYTE_LEN};

/// Encode an unsigned integer element of `width` bytes
///
/// The value is truncated to the width. Widths other than 1 and 2, or
/// tags above 7, are rejected.
pub fn encode_uint(tag: u8, value: u32, width: usize) -> Result<Vec<u8>> {
    let mut buf = BytesMut::with_capacity(3);
    put_uint(&mut buf, tag, value, Width::from_bytes(width)?)?;
    Ok(buf.to_vec())
}

/// Encode a byte array element
pub fn encode_bytes(tag: u8, data: &[u8]) -> Result<Vec<u8>> {
    let mut buf = BytesMut::with_capacity(2 + data.len());
    put_bytes(&mut buf, tag, data)?;
    Ok(buf.to_vec())
}

/// Append an unsigned integer element to `buf`
///
/// Format (1 byte): control + 0x01 + value
/// Format (2 bytes): control + value (LE)
pub fn put_uint(buf: &mut BytesMut, tag: u8, value: u32, width: Width) -> Result<()> {
    let control = control_byte(tag, width)?;
    buf.put_u8(control);
    match width {
        Width::One => {
            buf.put_u8(UINT_ONE_BYTE_LEN);
            buf.put_u8((value & 0xFF) as u8);
        }
        Width::Two => buf.put_u16_le((value & 0xFFFF) as u16),
    }
    Ok(())
}

/// Append a byte array element to `buf`
///
/// Nothing is written when the payload is too long.
pub fn put_bytes(buf: &mut BytesMut, tag: u8, data: &[u8]) -> Result<()> {
    if data.len() > MAX_BYTES_LEN {
        return Err(LampError::PayloadTooLarge {
            len: data.len(),
            max: MAX_BYTES_LEN,
        });
    }
    let control = bytes_control_byte(tag)?;
    buf.reserve(2 + data.len());
    buf.put_u8(control);
    buf.put_u8(data.len() as u8);
    buf.put_slice(data);
    Ok(())
}
