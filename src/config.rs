//! Configuration for smartlamp
//!
//! Centralized configuration with sensible defaults.

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use crate::error::{LampError, Result};

/// Main configuration shared by the controller and the device simulator
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Controller Configuration
    // -------------------------------------------------------------------------
    /// Address of the lamp endpoint (host:port)
    pub device_addr: String,

    /// How long to wait for a reply after each datagram (milliseconds)
    pub response_timeout_ms: u64,

    /// How long to wait for each pairing handshake reply (milliseconds)
    pub pairing_timeout_ms: u64,

    /// Receive buffer size; replies longer than this are truncated by the OS
    pub recv_buffer_size: usize,

    // -------------------------------------------------------------------------
    // Device Configuration
    // -------------------------------------------------------------------------
    /// UDP listen address of the simulator
    pub listen_addr: String,

    /// What the simulator reports about itself
    pub identity: DeviceIdentity,
}

/// Static identity of the lamp endpoint
///
/// Served by the basic-information and descriptor queries and used to
/// render the pairing payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub vendor_id: u16,
    pub product_id: u16,
    pub sw_major: u8,
    pub device_type: u16,
    pub server_clusters: Vec<u16>,
    pub discriminator: u16,
    pub setup_pin: u32,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            vendor_id: 0xFFF1,
            product_id: 0x8000,
            sw_major: 0,
            device_type: 0x0101, // dimmable light
            server_clusters: vec![0x0006, 0x0008, 0x001D, 0x0028],
            discriminator: 4520,
            setup_pin: 20202021,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_addr: "192.168.105.22:5540".to_string(),
            response_timeout_ms: 1000,
            pairing_timeout_ms: 2000,
            recv_buffer_size: 256,
            listen_addr: "0.0.0.0:5540".to_string(),
            identity: DeviceIdentity::default(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolve `device_addr` to a socket address
    pub fn resolve_device_addr(&self) -> Result<SocketAddr> {
        resolve(&self.device_addr)
    }

    /// Resolve `listen_addr` to a socket address
    pub fn resolve_listen_addr(&self) -> Result<SocketAddr> {
        resolve(&self.listen_addr)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    pub fn pairing_timeout(&self) -> Duration {
        Duration::from_millis(self.pairing_timeout_ms)
    }
}

fn resolve(addr: &str) -> Result<SocketAddr> {
    addr.to_socket_addrs()
        .map_err(|e| LampError::Config(format!("cannot resolve {}: {}", addr, e)))?
        .next()
        .ok_or_else(|| LampError::Config(format!("no address for {}", addr)))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the lamp endpoint address (host:port)
    pub fn device_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.device_addr = addr.into();
        self
    }

    /// Set the reply timeout (in milliseconds)
    pub fn response_timeout_ms(mut self, ms: u64) -> Self {
        self.config.response_timeout_ms = ms;
        self
    }

    /// Set the per-step pairing timeout (in milliseconds)
    pub fn pairing_timeout_ms(mut self, ms: u64) -> Self {
        self.config.pairing_timeout_ms = ms;
        self
    }

    /// Set the receive buffer size (in bytes)
    pub fn recv_buffer_size(mut self, size: usize) -> Self {
        self.config.recv_buffer_size = size;
        self
    }

    /// Set the simulator listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Replace the simulator identity
    pub fn identity(mut self, identity: DeviceIdentity) -> Self {
        self.config.identity = identity;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
