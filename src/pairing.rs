//! Pairing payload and handshake sequence
//!
//! The handshake only reproduces the packet shapes; nothing secret is
//! exchanged.

use std::fmt;

use crate::config::DeviceIdentity;
use crate::error::Result;
use crate::protocol::{encode_command, Command};

/// Onboarding payload, rendered as `MT:VVVV-PPPP:<discriminator>:<pin>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingPayload {
    pub vendor_id: u16,
    pub product_id: u16,
    pub discriminator: u16,
    pub pin: u32,
}

impl PairingPayload {
    pub fn from_identity(identity: &DeviceIdentity) -> Self {
        Self {
            vendor_id: identity.vendor_id,
            product_id: identity.product_id,
            discriminator: identity.discriminator,
            pin: identity.setup_pin,
        }
    }
}

impl fmt::Display for PairingPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MT:{:04X}-{:04X}:{}:{}",
            self.vendor_id, self.product_id, self.discriminator, self.pin
        )
    }
}

/// One packet of the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStep {
    PbkdfParamRequest,
    Pake1,
    Pake3,
}

impl HandshakeStep {
    pub const ALL: [HandshakeStep; 3] = [
        HandshakeStep::PbkdfParamRequest,
        HandshakeStep::Pake1,
        HandshakeStep::Pake3,
    ];

    pub fn command(self) -> Command {
        match self {
            HandshakeStep::PbkdfParamRequest => Command::PbkdfParamRequest,
            HandshakeStep::Pake1 => Command::Pake1,
            HandshakeStep::Pake3 => Command::Pake3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HandshakeStep::PbkdfParamRequest => "PBKDFParamRequest",
            HandshakeStep::Pake1 => "PAKE1",
            HandshakeStep::Pake3 => "PAKE3",
        }
    }
}

/// The handshake packets in the order they are sent
pub fn handshake() -> Result<Vec<(HandshakeStep, Vec<u8>)>> {
    HandshakeStep::ALL
        .iter()
        .map(|step| encode_command(&step.command()).map(|packet| (*step, packet)))
        .collect()
}
