//! Client round-trip tests

use std::net::UdpSocket;
use std::thread;

use smartlamp::network::{Client, Server};
use smartlamp::pairing::HandshakeStep;
use smartlamp::protocol::{
    decode_basic_info, decode_descriptor, decode_level_response, decode_timer_response,
    encode_command, Command, ACK,
};
use smartlamp::{Config, DeviceIdentity, LampError};

use super::TestDevice;

#[test]
fn test_request_skips_ack() {
    let device = TestDevice::start();
    let client = Client::new(&device.client_config()).unwrap();

    // The ACK for ON is still queued when the level read goes out
    client.send(&Command::On).unwrap();
    let reply = client.request(&Command::LevelRead).unwrap().unwrap();
    assert_eq!(decode_level_response(&reply), Some(127));
}

#[test]
fn test_exchange_returns_ack() {
    let device = TestDevice::start();
    let client = Client::new(&device.client_config()).unwrap();

    let packet = encode_command(&Command::Toggle).unwrap();
    let reply = client.exchange(&packet, device.client_config().response_timeout()).unwrap();
    assert_eq!(reply.as_deref(), Some(ACK));
    assert!(device.lamp.snapshot().on);
}

#[test]
fn test_queries_over_udp() {
    let device = TestDevice::start();
    let client = Client::new(&device.client_config()).unwrap();

    let info = client.request(&Command::BasicInfoRequest).unwrap().unwrap();
    let info = decode_basic_info(&info).unwrap();
    assert_eq!(info.vendor_id, Some(0xFFF1));
    assert_eq!(info.product_id, Some(0x8000));

    let desc = client.request(&Command::DescriptorRequest).unwrap().unwrap();
    let desc = decode_descriptor(&desc).unwrap();
    assert_eq!(desc.device_type, Some(0x0101));
    assert_eq!(desc.server_clusters, Some(vec![0x0006, 0x0008, 0x001D, 0x0028]));
}

#[test]
fn test_timer_over_udp() {
    let device = TestDevice::start();
    let client = Client::new(&device.client_config()).unwrap();

    client.send(&Command::On).unwrap();
    client.send(&Command::TimerWrite { seconds: 90 }).unwrap();
    let reply = client.request(&Command::TimerRead).unwrap().unwrap();
    let remaining = decode_timer_response(&reply).unwrap().unwrap();
    assert!((88..=90).contains(&remaining));
}

#[test]
fn test_request_times_out_on_silent_peer() {
    let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
    let config = Config::builder()
        .device_addr(silent.local_addr().unwrap().to_string())
        .response_timeout_ms(200)
        .build();
    let client = Client::new(&config).unwrap();

    assert_eq!(client.request(&Command::BasicInfoRequest).unwrap(), None);
}

#[test]
fn test_only_acks_is_no_response() {
    let device = TestDevice::start();
    let client = Client::new(&device.client_config()).unwrap();

    // ON is answered with ACK only
    assert_eq!(client.request(&Command::On).unwrap(), None);
}

#[test]
fn test_pair_transcript() {
    let device = TestDevice::start();
    let client = Client::new(&device.client_config()).unwrap();

    let transcript = client.pair().unwrap();
    assert_eq!(transcript.len(), 3);

    assert_eq!(transcript[0].step, HandshakeStep::PbkdfParamRequest);
    let pbkdf = transcript[0].response.as_ref().unwrap();
    assert_eq!(&pbkdf[..3], &[0x05, 0x34, 0x12]);

    let pake2 = transcript[1].response.as_ref().unwrap();
    assert_eq!(pake2.len(), 66);
    assert_eq!(pake2[0], 0x04);

    assert_eq!(transcript[2].response.as_deref(), Some(ACK));
    assert_eq!(device.lamp.snapshot().pairing.step, 2);
}

#[test]
fn test_zero_timeout_rejected() {
    let config = Config::builder()
        .device_addr("127.0.0.1:5540")
        .response_timeout_ms(0)
        .build();
    assert!(matches!(Client::new(&config), Err(LampError::Config(_))));
}

#[test]
fn test_unresolvable_device_rejected() {
    let config = Config::builder().device_addr("not an address").build();
    assert!(matches!(Client::new(&config), Err(LampError::Config(_))));
}

#[test]
fn test_server_from_config_reports_configured_identity() {
    let identity = DeviceIdentity {
        vendor_id: 0x1234,
        product_id: 0x5678,
        ..DeviceIdentity::default()
    };
    let config = Config::builder()
        .listen_addr("127.0.0.1:0")
        .identity(identity)
        .build();
    let mut server = Server::from_config(config);
    assert_eq!(server.lamp().identity().vendor_id, 0x1234);

    let addr = server.bind().unwrap();
    let shutdown = server.shutdown_handle();
    let handle = thread::spawn(move || server.run().unwrap());

    let client_config = Config::builder()
        .device_addr(addr.to_string())
        .response_timeout_ms(1000)
        .build();
    let client = Client::new(&client_config).unwrap();
    let info = client.request(&Command::BasicInfoRequest).unwrap().unwrap();
    let info = decode_basic_info(&info).unwrap();

    shutdown.shutdown();
    handle.join().unwrap();

    assert_eq!(info.vendor_id, Some(0x1234));
    assert_eq!(info.product_id, Some(0x5678));
}
