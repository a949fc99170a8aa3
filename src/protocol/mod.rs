//! Protocol Module
//!
//! The command and response shapes spoken between controller and lamp.
//!
//! ## Packet Format
//! One UDP datagram carries one command or one response, encoded as a flat
//! sequence of TLV elements (see [`crate::tlv`]). There is no framing,
//! length prefix or checksum.
//!
//! ### Commands (cluster / command id)
//! - 0x0006 / 0x01, 0x00, 0x02: ON, OFF, TOGGLE
//! - 0x0006 / 0x02 + attr 0x4001: DELAYED OFF write
//! - 0x0006 / 0x03 + attr 0x4001: DELAYED OFF read
//! - 0x0008 / 0x04: LEVEL set, 0x03: LEVEL read
//! - 0x0003 / 0x00: IDENTIFY
//! - 0x0028 / 0x01: BASIC INFORMATION
//! - 0x001D / 0x01: DESCRIPTOR
//! - 0x0000 / 0x01, 0x03, 0x05: PBKDF request, PAKE1, PAKE3
//!
//! ### Responses
//! - `ACK`: literal 3 bytes, never data
//! - Everything else: TLV, decoded leniently (unknown tags skipped)

mod command;
mod request;
mod response;
mod codec;

pub use command::{
    clamp_level, cluster, percent_to_raw, Command, ATTR_CURRENT_LEVEL, ATTR_DELAYED_OFF, MAX_LEVEL,
    PAKE1_POINT_LEN, PBKDF_ITERATIONS, PBKDF_PARAMS_LEN, PBKDF_RANDOM_LEN, PBKDF_SESSION_HINT,
};
pub use request::Request;
pub use response::{BasicInfo, Descriptor, Reply};
pub use codec::{
    decode_basic_info, decode_descriptor, decode_level_response, decode_timer_response,
    encode_command, encode_reply, ACK, PAKE2_OPCODE,
};
