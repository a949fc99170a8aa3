//! Control byte layout
//!
//! Constants and helpers shared by the encoders and the reader.

use crate::error::{LampError, Result};

/// Base value for an unsigned integer element (width bit clear)
pub const TYPE_UINT: u8 = 0x04;

/// Base value for a byte array element
pub const TYPE_BYTES: u8 = 0x10;

/// Bits of the base field that select the element type
pub const TYPE_MASK: u8 = 0x1C;

/// Low base bit: set for 2-byte unsigned integers
pub const WIDTH_BIT: u8 = 0x01;

/// The length byte a 1-byte unsigned integer always carries
pub const UINT_ONE_BYTE_LEN: u8 = 1;

/// Largest tag the 3-bit field can hold
pub const MAX_TAG: u8 = 7;

/// Largest byte array payload (single length byte)
pub const MAX_BYTES_LEN: usize = u8::MAX as usize;

const BASE_MASK: u8 = 0x1F;
const TAG_SHIFT: u8 = 5;

/// Width of an unsigned integer element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    One,
    Two,
}

impl Width {
    /// Map a byte count onto a width, rejecting anything but 1 and 2
    pub fn from_bytes(width: usize) -> Result<Self> {
        match width {
            1 => Ok(Width::One),
            2 => Ok(Width::Two),
            other => Err(LampError::InvalidArgument(format!(
                "unsigned int width must be 1 or 2, got {}",
                other
            ))),
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            Width::One => 1,
            Width::Two => 2,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Width::One => 0,
            Width::Two => WIDTH_BIT,
        }
    }
}

/// Build the control byte for an unsigned integer element
pub fn control_byte(tag: u8, width: Width) -> Result<u8> {
    Ok((check_tag(tag)? << TAG_SHIFT) | TYPE_UINT | width.bit())
}

/// Control byte for a byte array element
pub(crate) fn bytes_control_byte(tag: u8) -> Result<u8> {
    Ok((check_tag(tag)? << TAG_SHIFT) | TYPE_BYTES)
}

/// Split a control byte into `(tag, base)`
pub fn split_control(control: u8) -> (u8, u8) {
    ((control >> TAG_SHIFT) & MAX_TAG, control & BASE_MASK)
}

/// True when `base` marks an unsigned integer element
pub(crate) fn is_uint(base: u8) -> bool {
    base & TYPE_MASK == TYPE_UINT
}

fn check_tag(tag: u8) -> Result<u8> {
    if tag > MAX_TAG {
        return Err(LampError::InvalidArgument(format!(
            "tag must be in 0..={}, got {}",
            MAX_TAG, tag
        )));
    }
    Ok(tag)
}
