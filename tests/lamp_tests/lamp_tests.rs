//! Tests for lamp command handling
//!
//! These tests verify:
//! - On/off/toggle/level state transitions
//! - Query replies (level, timer, descriptor, basic information)
//! - Delayed-off scheduling, cancellation and expiry
//! - Packets the lamp ignores

use std::net::SocketAddr;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use smartlamp::lamp::DEFAULT_ON_LEVEL;
use smartlamp::protocol::{encode_command, Command, Reply, Request};
use smartlamp::tlv::encode_uint;
use smartlamp::{DeviceIdentity, Lamp};

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

fn send(lamp: &Lamp, command: Command) -> Option<Reply> {
    let request = Request::decode(&encode_command(&command).unwrap()).unwrap();
    lamp.handle(&request, peer())
}

// =============================================================================
// On/Off Tests
// =============================================================================

#[test]
fn test_on_from_dark_restores_default_level() {
    let lamp = Lamp::new(DeviceIdentity::default());
    assert_eq!(send(&lamp, Command::On), Some(Reply::Ack));

    let state = lamp.snapshot();
    assert!(state.on);
    assert_eq!(state.level, DEFAULT_ON_LEVEL);
    assert_eq!(state.output, DEFAULT_ON_LEVEL);
}

#[test]
fn test_on_keeps_existing_level() {
    let lamp = Lamp::new(DeviceIdentity::default());
    send(&lamp, Command::level_set(200));
    send(&lamp, Command::On);
    assert_eq!(lamp.snapshot().level, 200);
}

#[test]
fn test_off_clears_level() {
    let lamp = Lamp::new(DeviceIdentity::default());
    send(&lamp, Command::On);
    assert_eq!(send(&lamp, Command::Off), Some(Reply::Ack));

    let state = lamp.snapshot();
    assert!(!state.on);
    assert_eq!(state.level, 0);
    assert_eq!(state.output, 0);
}

#[test]
fn test_toggle_flips_state() {
    let lamp = Lamp::new(DeviceIdentity::default());
    assert_eq!(send(&lamp, Command::Toggle), Some(Reply::Ack));
    assert!(lamp.snapshot().on);
    assert_eq!(lamp.snapshot().level, DEFAULT_ON_LEVEL);

    send(&lamp, Command::Toggle);
    assert!(!lamp.snapshot().on);
    assert_eq!(lamp.snapshot().level, 0);
}

#[test]
fn test_on_off_requires_endpoint_zero() {
    let lamp = Lamp::new(DeviceIdentity::default());
    let mut bytes = encode_uint(0, 1, 1).unwrap();
    bytes.extend(encode_uint(1, 0x0006, 2).unwrap());
    bytes.extend(encode_uint(2, 0x01, 1).unwrap());

    let request = Request::decode(&bytes).unwrap();
    assert_eq!(lamp.handle(&request, peer()), None);
    assert!(!lamp.snapshot().on);
}

// =============================================================================
// Level Tests
// =============================================================================

#[test]
fn test_level_set_and_read() {
    let lamp = Lamp::new(DeviceIdentity::default());
    assert_eq!(send(&lamp, Command::level_percent(50)), Some(Reply::Ack));
    assert!(lamp.snapshot().on);
    assert_eq!(send(&lamp, Command::LevelRead), Some(Reply::Level { level: 127 }));
}

#[test]
fn test_level_zero_switches_off() {
    let lamp = Lamp::new(DeviceIdentity::default());
    send(&lamp, Command::On);
    send(&lamp, Command::level_set(0));
    assert!(!lamp.snapshot().on);
}

#[test]
fn test_level_read_other_attribute_acks() {
    let lamp = Lamp::new(DeviceIdentity::default());
    let mut bytes = encode_command(&Command::LevelRead).unwrap();
    bytes.truncate(9);
    bytes.extend(encode_uint(4, 0x0011, 2).unwrap());

    let request = Request::decode(&bytes).unwrap();
    assert_eq!(lamp.handle(&request, peer()), Some(Reply::Ack));
}

// =============================================================================
// Delayed Off Tests
// =============================================================================

#[test]
fn test_timer_write_then_read() {
    let lamp = Lamp::new(DeviceIdentity::default());
    send(&lamp, Command::On);
    assert_eq!(send(&lamp, Command::TimerWrite { seconds: 60 }), Some(Reply::Ack));

    match send(&lamp, Command::TimerRead) {
        Some(Reply::Timer { remaining }) => assert!((58..=60).contains(&remaining)),
        other => panic!("Expected timer reply, got {:?}", other),
    }
    assert!(lamp.snapshot().on);
}

#[test]
fn test_timer_read_without_timer_is_zero() {
    let lamp = Lamp::new(DeviceIdentity::default());
    assert_eq!(send(&lamp, Command::TimerRead), Some(Reply::Timer { remaining: 0 }));
}

#[test]
fn test_timer_zero_cancels() {
    let lamp = Lamp::new(DeviceIdentity::default());
    send(&lamp, Command::On);
    send(&lamp, Command::TimerWrite { seconds: 1 });
    send(&lamp, Command::TimerWrite { seconds: 0 });

    thread::sleep(Duration::from_millis(1500));
    let state = lamp.snapshot();
    assert!(state.on);
    assert_eq!(state.delayed_off_remaining, 0);
}

#[test]
fn test_timer_expiry_switches_off() {
    let lamp = Lamp::new(DeviceIdentity::default());
    send(&lamp, Command::On);
    send(&lamp, Command::TimerWrite { seconds: 1 });

    thread::sleep(Duration::from_millis(1500));
    let state = lamp.snapshot();
    assert!(!state.on);
    assert_eq!(state.level, 0);
}

#[test]
fn test_timer_reschedule_replaces_previous() {
    let lamp = Lamp::new(DeviceIdentity::default());
    send(&lamp, Command::On);
    send(&lamp, Command::TimerWrite { seconds: 1 });
    send(&lamp, Command::TimerWrite { seconds: 30 });

    thread::sleep(Duration::from_millis(1500));
    let state = lamp.snapshot();
    assert!(state.on);
    assert!(state.delayed_off_remaining >= 27);
}

#[test]
fn test_concurrent_schedules_leave_latest_timer_armed() {
    let lamp = Arc::new(Lamp::new(DeviceIdentity::default()));
    send(&lamp, Command::On);

    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let lamp = Arc::clone(&lamp);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                lamp.schedule_delayed_off(1);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    thread::sleep(Duration::from_millis(1500));
    let state = lamp.snapshot();
    assert!(!state.on, "the newest timer must still fire");
    assert_eq!(state.level, 0);
}

// =============================================================================
// Identify and Query Tests
// =============================================================================

#[test]
fn test_identify_window() {
    let lamp = Lamp::new(DeviceIdentity::default());
    assert_eq!(send(&lamp, Command::Identify { seconds: 5 }), Some(Reply::Ack));
    assert!(lamp.snapshot().identifying);

    send(&lamp, Command::Identify { seconds: 0 });
    assert!(!lamp.snapshot().identifying);
}

#[test]
fn test_descriptor_and_basic_info_from_identity() {
    let identity = DeviceIdentity {
        vendor_id: 0x1234,
        product_id: 0x5678,
        sw_major: 2,
        ..DeviceIdentity::default()
    };
    let lamp = Lamp::new(identity);

    assert_eq!(
        send(&lamp, Command::DescriptorRequest),
        Some(Reply::Descriptor {
            endpoint: 0,
            device_type: 0x0101,
            server_clusters: vec![0x0006, 0x0008, 0x001D, 0x0028],
        })
    );
    assert_eq!(
        send(&lamp, Command::BasicInfoRequest),
        Some(Reply::BasicInfo {
            endpoint: 0,
            vendor_id: 0x1234,
            product_id: 0x5678,
            sw_major: 2,
        })
    );
}

#[test]
fn test_unknown_cluster_ignored() {
    let lamp = Lamp::new(DeviceIdentity::default());
    let mut bytes = encode_uint(0, 0, 1).unwrap();
    bytes.extend(encode_uint(1, 0x0300, 2).unwrap());
    bytes.extend(encode_uint(2, 0x01, 1).unwrap());

    let request = Request::decode(&bytes).unwrap();
    assert_eq!(lamp.handle(&request, peer()), None);
}
