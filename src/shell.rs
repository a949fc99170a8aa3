//! Interactive command shell
//!
//! Parses one line of user input into a [`ShellCommand`] and runs it
//! through a [`Client`], returning the lines to print.
//!
//! ## Grammar
//! ```text
//! on | off | toggle
//! level <percent>    level?
//! timer <seconds>    timer?
//! identify <seconds>
//! info | desc | pair | exit
//! ```

use crate::error::{LampError, Result};
use crate::network::{hex_dump, Client};
use crate::protocol::{
    clamp_level, decode_basic_info, decode_descriptor, decode_level_response,
    decode_timer_response, percent_to_raw, Command, MAX_LEVEL,
};

/// Help line printed when the shell starts
pub const HELP: &str = "Type 'on', 'off', 'toggle', 'level <0-100>', 'level?', 'timer <sec>', \
                        'timer?', 'identify <sec>', 'info', 'desc', 'pair' or 'exit'";

/// A parsed shell line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    On,
    Off,
    Toggle,
    Level { percent: i64 },
    LevelQuery,
    Timer { seconds: u16 },
    TimerQuery,
    Identify { seconds: u16 },
    Info,
    Desc,
    Pair,
    Exit,
}

impl ShellCommand {
    /// Parse a line (case-insensitive, surrounding whitespace ignored)
    ///
    /// Errors carry the message to show the user.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim().to_lowercase();
        let mut words = line.split_whitespace();
        let head = words.next().unwrap_or("");
        let arg = words.next();

        let command = match (head, arg) {
            ("exit", None) => ShellCommand::Exit,
            ("on", None) => ShellCommand::On,
            ("off", None) => ShellCommand::Off,
            ("toggle", None) => ShellCommand::Toggle,
            ("level?", None) => ShellCommand::LevelQuery,
            ("timer?", None) => ShellCommand::TimerQuery,
            ("info", None) => ShellCommand::Info,
            ("desc", None) => ShellCommand::Desc,
            ("pair", None) => ShellCommand::Pair,
            ("level", arg) => ShellCommand::Level {
                percent: parse_arg(arg, "usage: level 0-100")?,
            },
            ("timer", arg) => ShellCommand::Timer {
                seconds: parse_arg(arg, "usage: timer <seconds>")?,
            },
            ("identify", arg) => ShellCommand::Identify {
                seconds: parse_arg(arg, "usage: identify <seconds>")?,
            },
            _ => return Err(LampError::InvalidArgument("unknown cmd".to_string())),
        };
        Ok(command)
    }
}

fn parse_arg<T: std::str::FromStr>(arg: Option<&str>, usage: &str) -> Result<T> {
    arg.and_then(|a| a.parse().ok())
        .ok_or_else(|| LampError::InvalidArgument(usage.to_string()))
}

/// Runs shell commands against one lamp
pub struct Shell {
    client: Client,
}

impl Shell {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Execute a command and return the output lines
    ///
    /// Timeouts and undecodable replies are reported in the output, not as
    /// errors. `Exit` does nothing.
    pub fn execute(&self, command: ShellCommand) -> Result<Vec<String>> {
        let lines = match command {
            ShellCommand::Exit => Vec::new(),
            ShellCommand::On => {
                self.client.send(&Command::On)?;
                vec!["sent ON".to_string()]
            }
            ShellCommand::Off => {
                self.client.send(&Command::Off)?;
                vec!["sent OFF".to_string()]
            }
            ShellCommand::Toggle => {
                self.client.send(&Command::Toggle)?;
                vec!["sent TOGGLE".to_string()]
            }
            ShellCommand::Level { percent } => {
                let raw = clamp_level(percent_to_raw(percent));
                self.client.send(&Command::LevelSet { level: raw })?;
                vec![format!("sent LEVEL → {}%  ({}/{})", percent, raw, MAX_LEVEL)]
            }
            ShellCommand::LevelQuery => match self.client.request(&Command::LevelRead)? {
                None => vec!["no response".to_string()],
                Some(data) => match decode_level_response(&data) {
                    Some(level) => vec![format!("Current level: {}", level)],
                    None => vec![unparsed(&data)],
                },
            },
            ShellCommand::Timer { seconds } => {
                self.client.send(&Command::TimerWrite { seconds })?;
                vec![format!("DelayedOff set to {} s", seconds)]
            }
            ShellCommand::TimerQuery => match self.client.request(&Command::TimerRead)? {
                None => vec!["no response".to_string()],
                Some(data) => match decode_timer_response(&data) {
                    Ok(Some(remaining)) => vec![format!("Remaining: {}", remaining)],
                    Ok(None) | Err(_) => vec![unparsed(&data)],
                },
            },
            ShellCommand::Identify { seconds } => {
                self.client.send(&Command::Identify { seconds })?;
                vec![format!("sent IDENTIFY → {} s", seconds)]
            }
            ShellCommand::Info => {
                let mut lines = vec!["sent BASIC request …".to_string()];
                lines.push(match self.client.request(&Command::BasicInfoRequest)? {
                    None => "no response".to_string(),
                    Some(data) => match decode_basic_info(&data) {
                        Ok(info) if !info.is_empty() => format!("Basic-Info decoded: {}", info),
                        _ => unparsed(&data),
                    },
                });
                lines
            }
            ShellCommand::Desc => {
                let mut lines = vec!["sent DESCRIPTOR request …".to_string()];
                lines.push(match self.client.request(&Command::DescriptorRequest)? {
                    None => "no response".to_string(),
                    Some(data) => match decode_descriptor(&data) {
                        Ok(desc) if !desc.is_empty() => format!("Descriptor decoded: {}", desc),
                        _ => unparsed(&data),
                    },
                });
                lines
            }
            ShellCommand::Pair => {
                let mut lines = Vec::new();
                for exchange in self.client.pair()? {
                    lines.push(format!(">> {}: {}", exchange.step.name(), hex_dump(&exchange.sent, "")));
                    lines.push(match &exchange.response {
                        Some(data) => format!("<< resp: {}", hex_dump(data, "")),
                        None => "!! timeout".to_string(),
                    });
                }
                lines
            }
        };
        Ok(lines)
    }
}

fn unparsed(data: &[u8]) -> String {
    format!("unparsed: {}", hex_dump(data, " "))
}
