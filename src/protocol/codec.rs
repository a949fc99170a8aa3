//! Protocol codec
//!
//! Builders for outbound commands and replies, and decoders for the
//! responses the controller understands.
//!
//! ## Command Layout
//! ```text
//! ┌──────────────────┬─────────────────────┬──────────────────┬──────────────┐
//! │ uint(0, 0, w1)   │ uint(1, cluster, w2)│ uint(2, cmd, w1) │ trailing ... │
//! └──────────────────┴─────────────────────┴──────────────────┴──────────────┘
//! ```
//!
//! ### Trailing Elements by Command
//! - Level set:   uint(3, level, w1)
//! - Level read:  uint(4, 0x0000, w2)
//! - Timer write: uint(4, 0x4001, w2) + uint(5, seconds, w2)
//! - Timer read:  uint(4, 0x4001, w2)
//! - Identify:    uint(0, seconds, w2)
//! - PBKDF:       uint(3, 0x1234, w2) + bytes(4, 16) + uint(5, 8000, w2) + bytes(6, 40)
//! - PAKE1:       bytes(4, 65)

use bytes::{BufMut, BytesMut};

use crate::error::Result;
use crate::tlv::{put_bytes, put_uint, TlvReader, Value, Width};
use super::command::{
    ATTR_CURRENT_LEVEL, ATTR_DELAYED_OFF, MAX_LEVEL, PAKE1_POINT_LEN, PBKDF_ITERATIONS,
    PBKDF_PARAMS_LEN, PBKDF_RANDOM_LEN, PBKDF_SESSION_HINT,
};
use super::{BasicInfo, Command, Descriptor, Reply};

/// The literal acknowledgement datagram
pub const ACK: &[u8] = b"ACK";

/// Opcode byte leading the PAKE2 reply
pub const PAKE2_OPCODE: u8 = 0x04;

// Placeholder fields of the PBKDF parameter response
const PBKDF_RESPONSE_ITERATIONS_CODE: u32 = 0x20;
const PBKDF_RESPONSE_VERSION: u32 = 0x03;

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command to bytes
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    let mut buf = BytesMut::with_capacity(16);

    // Header: endpoint marker, cluster, command
    put_uint(&mut buf, 0, 0, Width::One)?;
    put_uint(&mut buf, 1, command.cluster_id() as u32, Width::Two)?;
    put_uint(&mut buf, 2, command.command_id() as u32, Width::One)?;

    match *command {
        Command::On
        | Command::Off
        | Command::Toggle
        | Command::BasicInfoRequest
        | Command::DescriptorRequest
        | Command::Pake3 => {}
        Command::LevelSet { level } => {
            put_uint(&mut buf, 3, level.min(MAX_LEVEL) as u32, Width::One)?;
        }
        Command::LevelRead => {
            put_uint(&mut buf, 4, ATTR_CURRENT_LEVEL as u32, Width::Two)?;
        }
        Command::TimerWrite { seconds } => {
            put_uint(&mut buf, 4, ATTR_DELAYED_OFF as u32, Width::Two)?;
            put_uint(&mut buf, 5, seconds as u32, Width::Two)?;
        }
        Command::TimerRead => {
            put_uint(&mut buf, 4, ATTR_DELAYED_OFF as u32, Width::Two)?;
        }
        Command::Identify { seconds } => {
            // Tag 0 again, told apart from the endpoint by its width
            put_uint(&mut buf, 0, seconds as u32, Width::Two)?;
        }
        Command::PbkdfParamRequest => {
            put_uint(&mut buf, 3, PBKDF_SESSION_HINT as u32, Width::Two)?;
            put_bytes(&mut buf, 4, &[0u8; PBKDF_RANDOM_LEN])?;
            put_uint(&mut buf, 5, PBKDF_ITERATIONS as u32, Width::Two)?;
            put_bytes(&mut buf, 6, &[0u8; PBKDF_PARAMS_LEN])?;
        }
        Command::Pake1 => {
            put_bytes(&mut buf, 4, &[0u8; PAKE1_POINT_LEN])?;
        }
    }

    Ok(buf.to_vec())
}

// =============================================================================
// Reply Encoding
// =============================================================================

/// Encode a device reply to bytes
pub fn encode_reply(reply: &Reply) -> Result<Vec<u8>> {
    let mut buf = BytesMut::with_capacity(16);

    match reply {
        Reply::Ack => buf.put_slice(ACK),
        Reply::Level { level } => {
            put_uint(&mut buf, 4, ATTR_CURRENT_LEVEL as u32, Width::Two)?;
            put_uint(&mut buf, 5, *level as u32, Width::One)?;
        }
        Reply::Timer { remaining } => {
            put_uint(&mut buf, 4, ATTR_DELAYED_OFF as u32, Width::Two)?;
            put_uint(&mut buf, 5, *remaining as u32, Width::Two)?;
        }
        Reply::Descriptor {
            endpoint,
            device_type,
            server_clusters,
        } => {
            let mut list = BytesMut::with_capacity(server_clusters.len() * 2);
            for cluster in server_clusters {
                list.put_u16_le(*cluster);
            }
            put_uint(&mut buf, 0, *endpoint as u32, Width::One)?;
            put_uint(&mut buf, 1, *device_type as u32, Width::Two)?;
            put_bytes(&mut buf, 2, &list)?;
        }
        Reply::BasicInfo {
            endpoint,
            vendor_id,
            product_id,
            sw_major,
        } => {
            put_uint(&mut buf, 0, *endpoint as u32, Width::One)?;
            put_uint(&mut buf, 1, *vendor_id as u32, Width::Two)?;
            put_uint(&mut buf, 2, *product_id as u32, Width::Two)?;
            put_uint(&mut buf, 3, *sw_major as u32, Width::One)?;
        }
        Reply::PbkdfParams { session_id } => {
            put_uint(&mut buf, 0, *session_id as u32, Width::Two)?;
            put_uint(&mut buf, 1, PBKDF_RESPONSE_ITERATIONS_CODE, Width::One)?;
            put_uint(&mut buf, 2, PBKDF_RESPONSE_VERSION, Width::One)?;
            put_bytes(&mut buf, 3, &[0u8; PBKDF_RANDOM_LEN])?;
        }
        Reply::Pake2 => {
            buf.put_u8(PAKE2_OPCODE);
            buf.put_bytes(0, PAKE1_POINT_LEN);
        }
    }

    Ok(buf.to_vec())
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Decode a basic-information response
///
/// Tags 0..=3 map to endpoint, vendor id, product id and software major
/// version whatever their width. Anything else is skipped.
pub fn decode_basic_info(bytes: &[u8]) -> Result<BasicInfo> {
    let mut info = BasicInfo::default();
    for element in TlvReader::new(bytes) {
        let element = element?;
        let Some(value) = element.as_uint() else {
            continue;
        };
        match element.tag {
            0 => info.endpoint = Some(value),
            1 => info.vendor_id = Some(value),
            2 => info.product_id = Some(value),
            3 => info.sw_major = Some(value),
            _ => {}
        }
    }
    Ok(info)
}

/// Decode a descriptor response
///
/// The tag 2 byte array is read as little-endian cluster ids; an odd
/// trailing byte is dropped.
pub fn decode_descriptor(bytes: &[u8]) -> Result<Descriptor> {
    let mut descriptor = Descriptor::default();
    for element in TlvReader::new(bytes) {
        let element = element?;
        match (element.tag, element.value) {
            (0, Value::UInt { value, .. }) => descriptor.endpoint = Some(value),
            (1, Value::UInt { value, .. }) => descriptor.device_type = Some(value),
            (2, Value::Bytes(payload)) => {
                let clusters = payload
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                descriptor.server_clusters = Some(clusters);
            }
            _ => {}
        }
    }
    Ok(descriptor)
}

/// Decode a timer-read response
///
/// Returns the first 2-byte unsigned integer at tag 5, or `None` when the
/// input ends without one. Elements after the match are not inspected.
pub fn decode_timer_response(bytes: &[u8]) -> Result<Option<u16>> {
    for element in TlvReader::new(bytes) {
        let element = element?;
        if element.tag == 5 {
            if let Some(remaining) = element.as_uint_of(Width::Two) {
                return Ok(Some(remaining));
            }
        }
    }
    Ok(None)
}

/// Decode a level-read response
///
/// The level is the last byte of any response of at least three bytes;
/// shorter responses are unparsed.
pub fn decode_level_response(bytes: &[u8]) -> Option<u8> {
    if bytes.len() >= 3 {
        bytes.last().copied()
    } else {
        None
    }
}
