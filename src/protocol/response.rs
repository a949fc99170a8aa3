//! Response definitions
//!
//! Records decoded by the controller, and the replies the device sends.

use std::fmt;

/// Basic-information record
///
/// Fields the device did not send stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicInfo {
    pub endpoint: Option<u16>,
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
    pub sw_major: Option<u16>,
}

impl BasicInfo {
    /// True when no recognized field was present
    pub fn is_empty(&self) -> bool {
        self.endpoint.is_none()
            && self.vendor_id.is_none()
            && self.product_id.is_none()
            && self.sw_major.is_none()
    }
}

impl fmt::Display for BasicInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = FieldList::new(f);
        fields.int("endpoint", self.endpoint)?;
        fields.hex("vendor_id", self.vendor_id)?;
        fields.hex("product_id", self.product_id)?;
        fields.int("sw_major", self.sw_major)?;
        fields.finish()
    }
}

/// Descriptor record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    pub endpoint: Option<u16>,
    pub device_type: Option<u16>,
    pub server_clusters: Option<Vec<u16>>,
}

impl Descriptor {
    /// True when no recognized field was present
    pub fn is_empty(&self) -> bool {
        self.endpoint.is_none() && self.device_type.is_none() && self.server_clusters.is_none()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = FieldList::new(f);
        fields.int("endpoint", self.endpoint)?;
        fields.hex("device_type", self.device_type)?;
        if let Some(clusters) = &self.server_clusters {
            let list: Vec<String> = clusters.iter().map(|c| format!("0x{:04X}", c)).collect();
            fields.raw("server_clusters", &format!("[{}]", list.join(", ")))?;
        }
        fields.finish()
    }
}

/// Writes `{a: 1, b: 0x0002}` while skipping absent fields
struct FieldList<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
    first: bool,
}

impl<'a, 'b> FieldList<'a, 'b> {
    fn new(f: &'a mut fmt::Formatter<'b>) -> Self {
        Self { f, first: true }
    }

    fn raw(&mut self, name: &str, value: &str) -> fmt::Result {
        let sep = if self.first { "{" } else { ", " };
        self.first = false;
        write!(self.f, "{}{}: {}", sep, name, value)
    }

    fn int(&mut self, name: &str, value: Option<u16>) -> fmt::Result {
        match value {
            Some(v) => self.raw(name, &v.to_string()),
            None => Ok(()),
        }
    }

    fn hex(&mut self, name: &str, value: Option<u16>) -> fmt::Result {
        match value {
            Some(v) => self.raw(name, &format!("0x{:04X}", v)),
            None => Ok(()),
        }
    }

    fn finish(self) -> fmt::Result {
        if self.first {
            write!(self.f, "{{}}")
        } else {
            write!(self.f, "}}")
        }
    }
}

/// A reply sent by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain acknowledgement, the literal `ACK`
    Ack,

    /// Current level (answer to a level read)
    Level { level: u8 },

    /// Remaining delayed-off seconds (answer to a timer read)
    Timer { remaining: u16 },

    /// Descriptor cluster contents
    Descriptor {
        endpoint: u8,
        device_type: u16,
        server_clusters: Vec<u16>,
    },

    /// Basic-information cluster contents
    BasicInfo {
        endpoint: u8,
        vendor_id: u16,
        product_id: u16,
        sw_major: u8,
    },

    /// Answer to the PBKDF parameter request
    PbkdfParams { session_id: u16 },

    /// Answer to PAKE1: opcode byte plus a zeroed point, not TLV-encoded
    Pake2,
}
