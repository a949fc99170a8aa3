//! TLV Module
//!
//! The narrow tag-length-value subset spoken by the lamp.
//!
//! ## Element Format
//! ```text
//! ┌──────────────────────────┐
//! │ Control byte             │
//! │ ┌─────────┬────────────┐ │
//! │ │ Tag (3) │  Base (5)  │ │
//! │ └─────────┴────────────┘ │
//! └──────────────────────────┘
//!
//! UInt, 1 byte:   [control][0x01][value]
//! UInt, 2 bytes:  [control][lo][hi]
//! Byte array:     [control][len][payload ...]
//! ```
//!
//! ### Base Field
//! - `0b001_0x`: unsigned integer, low bit selects width (0 → 1 byte, 1 → 2 bytes)
//! - `0b100_00`: byte array, at most 255 bytes
//!
//! Only tags 0–7 exist and nothing nests. Element meaning is positional
//! within each command, see [`crate::protocol`].

mod control;
mod encode;
mod reader;

pub use control::{
    control_byte, split_control, Width, MAX_BYTES_LEN, MAX_TAG, TYPE_BYTES, TYPE_MASK,
    TYPE_UINT, UINT_ONE_BYTE_LEN, WIDTH_BIT,
};
pub use encode::{encode_bytes, encode_uint, put_bytes, put_uint};
pub use reader::{Element, TlvReader, Value};
