//! Request definitions
//!
//! What the device extracts from an incoming command packet.

use crate::error::Result;
use crate::tlv::{TlvReader, Value, Width};

/// Header and arguments of a received command
///
/// Fields are picked by tag *and* width, so the 1-byte endpoint and the
/// 2-byte identify time can share tag 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Request {
    /// Tag 0, 1 byte
    pub endpoint: Option<u16>,

    /// Tag 1, 2 bytes
    pub cluster: Option<u16>,

    /// Tag 2, 1 byte
    pub command: Option<u16>,

    /// Tag 3, 1 byte
    pub level: Option<u16>,

    /// Tag 4, 2 bytes
    pub attribute: Option<u16>,

    /// Tag 5, 2 bytes
    pub value: Option<u16>,

    /// Tag 0, 2 bytes
    pub identify_time: Option<u16>,
}

impl Request {
    /// Parse a command packet
    ///
    /// Byte arrays, unknown tags and unexpected widths are skipped; a
    /// truncated element fails the whole packet.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut request = Request::default();
        for element in TlvReader::new(bytes) {
            let element = element?;
            let (value, width) = match element.value {
                Value::UInt { value, width } => (value, width),
                Value::Bytes(_) => continue,
            };
            let slot = match (element.tag, width) {
                (0, Width::One) => &mut request.endpoint,
                (0, Width::Two) => &mut request.identify_time,
                (1, Width::Two) => &mut request.cluster,
                (2, Width::One) => &mut request.command,
                (3, Width::One) => &mut request.level,
                (4, Width::Two) => &mut request.attribute,
                (5, Width::Two) => &mut request.value,
                _ => continue,
            };
            *slot = Some(value);
        }
        Ok(request)
    }

    /// True when both the cluster and the command id match
    pub fn is(&self, cluster: u16, command: u8) -> bool {
        self.cluster == Some(cluster) && self.command == Some(command as u16)
    }
}
