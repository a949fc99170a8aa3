//! Network Module
//!
//! UDP plumbing around the codec.
//!
//! ## Architecture
//! - `Client`: controller side, one blocking socket, request/reply with
//!   `ACK` filtering and a per-receive timeout
//! - `Server`: device side, single receive loop dispatching into a `Lamp`

mod client;
mod server;

pub use client::{Client, HandshakeExchange};
pub use server::{Server, ShutdownHandle};

/// Lowercase hex with a separator, e.g. `"05 01 00"`
pub fn hex_dump(bytes: &[u8], sep: &str) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(sep)
}

/// True for the error kinds a socket read timeout produces
/// (`WouldBlock` on Unix, `TimedOut` on Windows)
pub(crate) fn is_timeout(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}
