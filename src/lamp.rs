//! Lamp Module
//!
//! State machine of the simulated lamp endpoint.
//!
//! ## Responsibilities
//! - Apply on/off, level, identify and delayed-off commands
//! - Answer level, timer, descriptor and basic-information queries
//! - Track the (placeholder) pairing handshake
//!
//! ## Concurrency Model
//! State sits behind a single `parking_lot::Mutex` shared with the
//! delayed-off timer thread. Each timer gets a generation number; a timer
//! whose generation is stale when it fires does nothing. Rescheduling drops
//! the old timer's channel sender, which wakes and ends its thread.

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::config::DeviceIdentity;
use crate::protocol::{cluster, Reply, Request, ATTR_CURRENT_LEVEL, ATTR_DELAYED_OFF};

/// Level restored when the lamp is switched on while dark
pub const DEFAULT_ON_LEVEL: u8 = 127;

/// Session id handed out by the PBKDF parameter response
pub const PAIRING_SESSION_ID: u16 = 0x1234;

/// Pairing handshake progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairingSession {
    /// A PBKDF request opened a session that has not completed yet
    pub active: bool,

    /// 0 after PBKDF, 1 after PAKE1, 2 once PAKE3 completed
    pub step: u8,

    pub session_id: u16,

    pub peer: Option<SocketAddr>,
}

#[derive(Debug, Default)]
struct LampState {
    level: u8,
    on: bool,
    off_deadline: Option<Instant>,
    timer_generation: u64,
    identify_until: Option<Instant>,
    pairing: PairingSession,
}

/// Point-in-time view of the lamp, for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LampSnapshot {
    pub level: u8,
    pub on: bool,
    /// What the PWM output would drive (0 when off)
    pub output: u8,
    pub delayed_off_remaining: u16,
    pub identifying: bool,
    pub pairing: PairingSession,
}

/// The simulated lamp
pub struct Lamp {
    identity: DeviceIdentity,
    state: Arc<Mutex<LampState>>,
    timer_cancel: Mutex<Option<Sender<()>>>,
}

impl Lamp {
    pub fn new(identity: DeviceIdentity) -> Self {
        Self {
            identity,
            state: Arc::new(Mutex::new(LampState::default())),
            timer_cancel: Mutex::new(None),
        }
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Apply a request and produce the reply to send, if any
    ///
    /// `peer` is remembered when a pairing session opens.
    pub fn handle(&self, request: &Request, peer: SocketAddr) -> Option<Reply> {
        if request.cluster == Some(cluster::ON_OFF) && request.endpoint == Some(0) {
            if let Some(reply) = self.handle_on_off(request) {
                return Some(reply);
            }
        }

        if request.is(cluster::IDENTIFY, 0x00) {
            self.identify(request.identify_time.unwrap_or(0));
            return Some(Reply::Ack);
        }

        if request.is(cluster::LEVEL_CONTROL, 0x04) {
            self.set_level(request.level.unwrap_or(0) as u8);
            return Some(Reply::Ack);
        }

        if request.is(cluster::LEVEL_CONTROL, 0x03) {
            if request.attribute.unwrap_or(0) == ATTR_CURRENT_LEVEL {
                let level = self.state.lock().level;
                return Some(Reply::Level { level });
            }
            return Some(Reply::Ack);
        }

        if request.is(cluster::DESCRIPTOR, 0x01) {
            return Some(Reply::Descriptor {
                endpoint: 0,
                device_type: self.identity.device_type,
                server_clusters: self.identity.server_clusters.clone(),
            });
        }

        if request.is(cluster::BASIC_INFORMATION, 0x01) {
            return Some(Reply::BasicInfo {
                endpoint: 0,
                vendor_id: self.identity.vendor_id,
                product_id: self.identity.product_id,
                sw_major: self.identity.sw_major,
            });
        }

        if request.cluster == Some(cluster::PAIRING) {
            return self.handle_pairing(request, peer);
        }

        tracing::debug!("No handler for {:?}", request);
        None
    }

    fn handle_on_off(&self, request: &Request) -> Option<Reply> {
        match request.command {
            Some(0x01) => {
                let mut state = self.state.lock();
                if state.level == 0 {
                    state.level = DEFAULT_ON_LEVEL;
                }
                state.on = true;
                tracing::info!("Lamp ON (level={})", state.level);
                Some(Reply::Ack)
            }
            Some(0x00) => {
                let mut state = self.state.lock();
                state.level = 0;
                state.on = false;
                tracing::info!("Lamp OFF");
                Some(Reply::Ack)
            }
            Some(0x02) => {
                if request.attribute == Some(ATTR_DELAYED_OFF) {
                    let seconds = request.value.unwrap_or(0);
                    self.schedule_delayed_off(seconds);
                    tracing::info!("Delayed off = {} s", seconds);
                } else {
                    self.toggle();
                }
                Some(Reply::Ack)
            }
            Some(0x03) => {
                if request.attribute == Some(ATTR_DELAYED_OFF) {
                    let remaining = remaining_secs(self.state.lock().off_deadline);
                    Some(Reply::Timer { remaining })
                } else {
                    Some(Reply::Ack)
                }
            }
            _ => None,
        }
    }

    fn handle_pairing(&self, request: &Request, peer: SocketAddr) -> Option<Reply> {
        let mut state = self.state.lock();
        let pairing = &mut state.pairing;

        match request.command {
            Some(0x01) => {
                *pairing = PairingSession {
                    active: true,
                    step: 0,
                    session_id: PAIRING_SESSION_ID,
                    peer: Some(peer),
                };
                tracing::info!("PBKDF parameter request from {}", peer);
                Some(Reply::PbkdfParams {
                    session_id: pairing.session_id,
                })
            }
            Some(0x03) if pairing.active => {
                pairing.step = 1;
                tracing::info!("PAKE1 from {}, sending PAKE2", peer);
                Some(Reply::Pake2)
            }
            Some(0x05) if pairing.active && pairing.step == 1 => {
                pairing.active = false;
                pairing.step = 2;
                tracing::info!("PAKE3 from {}, pairing complete", peer);
                Some(Reply::Ack)
            }
            other => {
                tracing::warn!(
                    "Pairing command {:?} out of sequence (active={}, step={})",
                    other,
                    pairing.active,
                    pairing.step
                );
                None
            }
        }
    }

    /// Flip the on/off state, restoring the default level when switching on dark
    pub fn toggle(&self) {
        let mut state = self.state.lock();
        if state.on {
            state.level = 0;
            state.on = false;
            tracing::info!("Lamp TOGGLE -> OFF");
        } else {
            if state.level == 0 {
                state.level = DEFAULT_ON_LEVEL;
            }
            state.on = true;
            tracing::info!("Lamp TOGGLE -> ON (level={})", state.level);
        }
    }

    /// Set the raw level; the lamp is on exactly when the level is non-zero
    pub fn set_level(&self, level: u8) {
        let mut state = self.state.lock();
        state.level = level;
        state.on = level > 0;
        tracing::info!("Level set to {}", level);
    }

    /// Start (or with 0, end) an identify window
    pub fn identify(&self, seconds: u16) {
        let mut state = self.state.lock();
        state.identify_until = if seconds == 0 {
            None
        } else {
            Some(Instant::now() + Duration::from_secs(seconds as u64))
        };
        tracing::info!("Identify for {} s", seconds);
    }

    /// Switch off after `seconds`; 0 cancels a pending timer
    pub fn schedule_delayed_off(&self, seconds: u16) {
        // Held across the generation bump so concurrent calls install
        // their senders in generation order
        let mut cancel = self.timer_cancel.lock();
        let generation = {
            let mut state = self.state.lock();
            state.timer_generation += 1;
            state.off_deadline = if seconds == 0 {
                None
            } else {
                Some(Instant::now() + Duration::from_secs(seconds as u64))
            };
            state.timer_generation
        };

        // Dropping the previous sender wakes its thread with Disconnected
        *cancel = None;
        if seconds == 0 {
            return;
        }

        let (tx, rx) = channel::bounded::<()>(0);
        let state = Arc::clone(&self.state);
        let delay = Duration::from_secs(seconds as u64);
        thread::spawn(move || {
            if let Err(RecvTimeoutError::Timeout) = rx.recv_timeout(delay) {
                let mut state = state.lock();
                if state.timer_generation == generation {
                    state.level = 0;
                    state.on = false;
                    state.off_deadline = None;
                    tracing::info!("Delayed off elapsed, lamp OFF");
                }
            }
        });
        *cancel = Some(tx);
    }

    pub fn snapshot(&self) -> LampSnapshot {
        let state = self.state.lock();
        let now = Instant::now();
        LampSnapshot {
            level: state.level,
            on: state.on,
            output: if state.on { state.level } else { 0 },
            delayed_off_remaining: remaining_secs(state.off_deadline),
            identifying: state.identify_until.map_or(false, |until| until > now),
            pairing: state.pairing,
        }
    }
}

impl Drop for Lamp {
    fn drop(&mut self) {
        // Wake a pending timer thread so it exits
        self.timer_cancel.lock().take();
    }
}

/// Whole seconds until `deadline`, truncated, 0 when none or past
fn remaining_secs(deadline: Option<Instant>) -> u16 {
    deadline
        .map(|d| d.saturating_duration_since(Instant::now()).as_secs())
        .map_or(0, |secs| secs.min(u16::MAX as u64) as u16)
}
