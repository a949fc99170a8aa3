//! UDP Server
//!
//! Receives command datagrams and answers on behalf of a `Lamp`.

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{LampError, Result};
use crate::lamp::Lamp;
use crate::protocol::{encode_reply, Request};
use super::{hex_dump, is_timeout};

/// How often the receive loop checks the shutdown flag
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Largest datagram the server reads
const MAX_DATAGRAM: usize = 1500;

/// Stops a running server from another thread
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

/// UDP server for the simulated lamp
pub struct Server {
    config: Config,
    lamp: Arc<Lamp>,
    socket: Option<UdpSocket>,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Create a new server with the given config and lamp
    pub fn new(config: Config, lamp: Arc<Lamp>) -> Self {
        Self {
            config,
            lamp,
            socket: None,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a server whose lamp reports `config.identity`
    pub fn from_config(config: Config) -> Self {
        let lamp = Arc::new(Lamp::new(config.identity.clone()));
        Self::new(config, lamp)
    }

    /// The lamp this server answers for
    pub fn lamp(&self) -> Arc<Lamp> {
        Arc::clone(&self.lamp)
    }

    /// Bind the listen socket (idempotent) and return the bound address
    pub fn bind(&mut self) -> Result<SocketAddr> {
        if let Some(socket) = &self.socket {
            return Ok(socket.local_addr()?);
        }
        let addr = self.config.resolve_listen_addr()?;
        let socket = UdpSocket::bind(addr)
            .map_err(|e| LampError::Network(format!("cannot bind {}: {}", addr, e)))?;
        socket.set_read_timeout(Some(POLL_INTERVAL))?;
        let local = socket.local_addr()?;
        tracing::info!("UDP listening on {}", local);
        self.socket = Some(socket);
        Ok(local)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Signal the server to stop after the current datagram
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Serve until shut down (blocking)
    pub fn run(&mut self) -> Result<()> {
        self.bind()?;
        let socket = match &self.socket {
            Some(socket) => socket,
            None => return Err(LampError::Network("socket not bound".to_string())),
        };

        let mut buf = [0u8; MAX_DATAGRAM];
        while !self.shutdown.load(Ordering::Relaxed) {
            let (len, peer) = match socket.recv_from(&mut buf) {
                Ok(received) => received,
                Err(ref e) if is_timeout(e) => continue,
                Err(ref e) if e.kind() == std::io::ErrorKind::ConnectionReset => {
                    // Windows reports ICMP port-unreachable from an earlier send here
                    tracing::debug!("Connection reset reported, ignoring");
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Receive error: {}", e);
                    return Err(e.into());
                }
            };

            let packet = &buf[..len];
            tracing::debug!("RX from {}: {}", peer, hex_dump(packet, " "));

            if let Err(e) = self.handle_packet(socket, packet, peer) {
                tracing::warn!("Dropping packet from {}: {}", peer, e);
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    fn handle_packet(&self, socket: &UdpSocket, packet: &[u8], peer: SocketAddr) -> Result<()> {
        let request = Request::decode(packet)?;
        tracing::trace!("Parsed {:?}", request);

        let Some(reply) = self.lamp.handle(&request, peer) else {
            return Ok(());
        };
        let bytes = encode_reply(&reply)?;
        socket.send_to(&bytes, peer)?;
        tracing::debug!("TX {:?} to {}: {}", reply, peer, hex_dump(&bytes, " "));
        Ok(())
    }
}
