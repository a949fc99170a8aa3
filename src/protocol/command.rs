//! Command definitions
//!
//! The closed set of operations the controller can send.

/// Cluster identifiers carried at tag 1 of every command
pub mod cluster {
    pub const PAIRING: u16 = 0x0000;
    pub const IDENTIFY: u16 = 0x0003;
    pub const ON_OFF: u16 = 0x0006;
    pub const LEVEL_CONTROL: u16 = 0x0008;
    pub const DESCRIPTOR: u16 = 0x001D;
    pub const BASIC_INFORMATION: u16 = 0x0028;
}

/// Attribute selecting the delayed-off timer on the on/off cluster
pub const ATTR_DELAYED_OFF: u16 = 0x4001;

/// Attribute selecting the current level on the level-control cluster
pub const ATTR_CURRENT_LEVEL: u16 = 0x0000;

/// Highest raw level the lamp accepts
pub const MAX_LEVEL: u8 = 254;

// Pairing placeholders. Only the wire shape matters; no key exchange
// happens and every secret-looking field is zero-filled.
pub const PBKDF_SESSION_HINT: u16 = 0x1234;
pub const PBKDF_ITERATIONS: u16 = 8000;
pub const PBKDF_RANDOM_LEN: usize = 16;
pub const PBKDF_PARAMS_LEN: usize = 40;
pub const PAKE1_POINT_LEN: usize = 65;

/// A command for the lamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Switch on (restores a default level when dark)
    On,

    /// Switch off
    Off,

    /// Flip the on/off state
    Toggle,

    /// Set the raw level (0..=254)
    LevelSet { level: u8 },

    /// Ask for the current level
    LevelRead,

    /// Switch off after `seconds` (0 cancels)
    TimerWrite { seconds: u16 },

    /// Ask for the remaining delayed-off seconds
    TimerRead,

    /// Blink for `seconds` so the user can spot the device
    Identify { seconds: u16 },

    /// Ask for vendor/product information
    BasicInfoRequest,

    /// Ask for the device type and server cluster list
    DescriptorRequest,

    /// First pairing handshake packet
    PbkdfParamRequest,

    /// Second pairing handshake packet
    Pake1,

    /// Final pairing handshake packet
    Pake3,
}

impl Command {
    /// Level set from an arbitrary integer, clamped to 0..=254
    pub fn level_set(level: i64) -> Self {
        Command::LevelSet {
            level: clamp_level(level),
        }
    }

    /// Level set from a percentage
    pub fn level_percent(percent: i64) -> Self {
        Self::level_set(percent_to_raw(percent))
    }

    /// Cluster identifier (tag 1)
    pub fn cluster_id(&self) -> u16 {
        match self {
            Command::On | Command::Off | Command::Toggle => cluster::ON_OFF,
            Command::TimerWrite { .. } | Command::TimerRead => cluster::ON_OFF,
            Command::LevelSet { .. } | Command::LevelRead => cluster::LEVEL_CONTROL,
            Command::Identify { .. } => cluster::IDENTIFY,
            Command::BasicInfoRequest => cluster::BASIC_INFORMATION,
            Command::DescriptorRequest => cluster::DESCRIPTOR,
            Command::PbkdfParamRequest | Command::Pake1 | Command::Pake3 => cluster::PAIRING,
        }
    }

    /// Command identifier (tag 2)
    ///
    /// Toggle and timer write share 0x02; the device tells them apart by
    /// the attribute at tag 4.
    pub fn command_id(&self) -> u8 {
        match self {
            Command::Off => 0x00,
            Command::On => 0x01,
            Command::Toggle => 0x02,
            Command::LevelSet { .. } => 0x04,
            Command::LevelRead => 0x03,
            Command::TimerWrite { .. } => 0x02,
            Command::TimerRead => 0x03,
            Command::Identify { .. } => 0x00,
            Command::BasicInfoRequest => 0x01,
            Command::DescriptorRequest => 0x01,
            Command::PbkdfParamRequest => 0x01,
            Command::Pake1 => 0x03,
            Command::Pake3 => 0x05,
        }
    }
}

/// Convert a percentage to a raw level: `floor(percent * 254 / 100)`
///
/// No clamping happens here; out-of-range results are clamped by
/// [`Command::level_set`].
pub fn percent_to_raw(percent: i64) -> i64 {
    (percent.saturating_mul(MAX_LEVEL as i64)).div_euclid(100)
}

/// Clamp an arbitrary integer into the raw level range 0..=254
pub fn clamp_level(level: i64) -> u8 {
    level.clamp(0, MAX_LEVEL as i64) as u8
}
