//! UDP Client
//!
//! Sends commands to the lamp and waits for replies.

use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use crate::config::Config;
use crate::error::{LampError, Result};
use crate::pairing::{handshake, HandshakeStep};
use crate::protocol::{encode_command, Command, ACK};
use super::{hex_dump, is_timeout};

/// One step of a pairing run: what was sent and what came back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeExchange {
    pub step: HandshakeStep,
    pub sent: Vec<u8>,
    pub response: Option<Vec<u8>>,
}

/// Controller-side UDP client
pub struct Client {
    /// Ephemeral local socket
    socket: UdpSocket,

    /// Lamp endpoint
    device: SocketAddr,

    recv_buffer_size: usize,
    response_timeout: Duration,
    pairing_timeout: Duration,
}

impl Client {
    /// Bind an ephemeral socket for talking to `config.device_addr`
    pub fn new(config: &Config) -> Result<Self> {
        let device = config.resolve_device_addr()?;
        if config.response_timeout_ms == 0 || config.pairing_timeout_ms == 0 {
            return Err(LampError::Config("timeouts must be non-zero".to_string()));
        }

        let local = if device.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local)?;
        tracing::debug!("Client bound to {}, device {}", socket.local_addr()?, device);

        Ok(Self {
            socket,
            device,
            recv_buffer_size: config.recv_buffer_size,
            response_timeout: config.response_timeout(),
            pairing_timeout: config.pairing_timeout(),
        })
    }

    pub fn device_addr(&self) -> SocketAddr {
        self.device
    }

    /// Send a command without waiting for anything
    pub fn send(&self, command: &Command) -> Result<()> {
        let bytes = encode_command(command)?;
        tracing::debug!("TX {:?}: {}", command, hex_dump(&bytes, " "));
        self.send_raw(&bytes)
    }

    /// Send raw bytes to the device
    pub fn send_raw(&self, bytes: &[u8]) -> Result<()> {
        let sent = self.socket.send_to(bytes, self.device)?;
        if sent != bytes.len() {
            return Err(LampError::Network(format!(
                "short send: {} of {} bytes",
                sent,
                bytes.len()
            )));
        }
        Ok(())
    }

    /// Send a command and wait for the first non-`ACK` reply
    ///
    /// Returns `None` if nothing but `ACK`s arrive before the timeout.
    pub fn request(&self, command: &Command) -> Result<Option<Vec<u8>>> {
        self.send(command)?;
        self.recv_skip_ack()
    }

    /// Wait for a datagram, skipping `ACK`s
    ///
    /// The timeout restarts after every `ACK`.
    pub fn recv_skip_ack(&self) -> Result<Option<Vec<u8>>> {
        loop {
            match self.recv(self.response_timeout)? {
                Some(data) if data == ACK => {
                    tracing::trace!("Skipping ACK");
                    continue;
                }
                other => return Ok(other),
            }
        }
    }

    /// Send raw bytes and return whatever arrives first, `ACK` included
    pub fn exchange(&self, bytes: &[u8], timeout: Duration) -> Result<Option<Vec<u8>>> {
        self.send_raw(bytes)?;
        self.recv(timeout)
    }

    /// Run the placeholder pairing handshake
    ///
    /// Every step is sent even if an earlier one timed out.
    pub fn pair(&self) -> Result<Vec<HandshakeExchange>> {
        let mut transcript = Vec::with_capacity(HandshakeStep::ALL.len());
        for (step, packet) in handshake()? {
            tracing::info!("{} -> {}", step.name(), hex_dump(&packet, ""));
            let response = self.exchange(&packet, self.pairing_timeout)?;
            match &response {
                Some(data) => tracing::info!("{} <- {}", step.name(), hex_dump(data, "")),
                None => tracing::warn!("{} timed out", step.name()),
            }
            transcript.push(HandshakeExchange {
                step,
                sent: packet,
                response,
            });
        }
        Ok(transcript)
    }

    fn recv(&self, timeout: Duration) -> Result<Option<Vec<u8>>> {
        self.socket.set_read_timeout(Some(timeout))?;
        let mut buf = vec![0u8; self.recv_buffer_size];
        match self.socket.recv_from(&mut buf) {
            Ok((len, from)) => {
                buf.truncate(len);
                tracing::debug!("RX from {}: {}", from, hex_dump(&buf, " "));
                Ok(Some(buf))
            }
            Err(ref e) if is_timeout(e) => {
                tracing::debug!("No reply within {:?}", timeout);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
