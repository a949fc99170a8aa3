//! # smartlamp
//!
//! Controller and simulator for a single smart-lamp endpoint over UDP:
//! - Compact TLV wire encoding (tags 0–7, 1/2-byte uints, byte arrays)
//! - Fixed command set: on/off, level, delayed off, identify, queries
//! - Placeholder pairing handshake (packet shapes only)
//! - Lenient, bounds-checked response decoding
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────┐                    ┌──────────────────────┐
//! │   Shell / CLI        │                    │   Device binary      │
//! └──────────┬───────────┘                    └──────────┬───────────┘
//!            │                                           │
//! ┌──────────▼───────────┐      UDP datagram  ┌──────────▼───────────┐
//! │   network::Client    │ ─────────────────► │   network::Server    │
//! │  (ACK skip, timeout) │ ◄───────────────── │    (recv loop)       │
//! └──────────┬───────────┘                    └──────────┬───────────┘
//!            │                                           │
//! ┌──────────▼───────────┐                    ┌──────────▼───────────┐
//! │  protocol builders   │                    │  Request → Lamp →    │
//! │  and decoders        │                    │  Reply               │
//! └──────────┬───────────┘                    └──────────┬───────────┘
//!            │                                           │
//!            └──────────────────┬────────────────────────┘
//!                               ▼
//!                     ┌───────────────────┐
//!                     │  tlv (encode /    │
//!                     │  reader)          │
//!                     └───────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod tlv;
pub mod protocol;
pub mod pairing;
pub mod lamp;
pub mod network;
pub mod shell;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LampError, Result};
pub use config::{Config, DeviceIdentity};
pub use lamp::Lamp;
pub use protocol::Command;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of smartlamp
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
