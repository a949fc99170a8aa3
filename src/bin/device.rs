//! smartlamp Device Binary
//!
//! Runs the simulated lamp on a UDP port.

use clap::Parser;
use smartlamp::network::Server;
use smartlamp::pairing::PairingPayload;
use smartlamp::{Config, DeviceIdentity};
use tracing_subscriber::{fmt, EnvFilter};

/// smartlamp Device Simulator
#[derive(Parser, Debug)]
#[command(name = "smartlamp-device")]
#[command(about = "Simulated smart lamp speaking the TLV command protocol")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "0.0.0.0:5540")]
    listen: String,

    /// Vendor id reported by basic information
    #[arg(long, default_value = "0xFFF1", value_parser = parse_u16)]
    vendor_id: u16,

    /// Product id reported by basic information
    #[arg(long, default_value = "0x8000", value_parser = parse_u16)]
    product_id: u16,

    /// Discriminator shown in the pairing payload
    #[arg(short, long, default_value = "4520")]
    discriminator: u16,

    /// Setup PIN shown in the pairing payload
    #[arg(short, long, default_value = "20202021")]
    pin: u32,
}

/// Accept decimal or `0x`-prefixed hex
fn parse_u16(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid id '{}': {}", s, e))
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,smartlamp=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    let identity = DeviceIdentity {
        vendor_id: args.vendor_id,
        product_id: args.product_id,
        discriminator: args.discriminator,
        setup_pin: args.pin,
        ..DeviceIdentity::default()
    };

    tracing::info!("smartlamp device v{}", smartlamp::VERSION);
    tracing::info!("Listen address: {}", args.listen);
    tracing::info!("Pairing payload: {}", PairingPayload::from_identity(&identity));

    let config = Config::builder()
        .listen_addr(&args.listen)
        .identity(identity)
        .build();

    let mut server = Server::from_config(config);
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
