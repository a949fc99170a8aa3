//! smartlamp CLI Client
//!
//! Command-line interface for controlling a lamp.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use smartlamp::network::Client;
use smartlamp::pairing::PairingPayload;
use smartlamp::shell::{Shell, ShellCommand, HELP};
use smartlamp::{Config, DeviceIdentity};
use tracing_subscriber::{fmt, EnvFilter};

/// smartlamp CLI
#[derive(Parser, Debug)]
#[command(name = "smartlamp-cli")]
#[command(about = "Control a smart lamp over UDP")]
#[command(version)]
struct Args {
    /// Lamp address (host:port)
    #[arg(short, long, default_value = "192.168.105.22:5540")]
    device: String,

    /// Reply timeout in milliseconds
    #[arg(short, long, default_value = "1000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive prompt (default)
    Shell,

    /// Run a single shell command, e.g. `send level 50`
    Send {
        /// Command words
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },

    /// Run the pairing handshake
    Pair,

    /// Print the pairing payload string
    Payload,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    if let Some(Commands::Payload) = args.command {
        let payload = PairingPayload::from_identity(&DeviceIdentity::default());
        println!("QR Payload → {}", payload);
        return;
    }

    let config = Config::builder()
        .device_addr(&args.device)
        .response_timeout_ms(args.timeout_ms)
        .build();

    let shell = match Client::new(&config) {
        Ok(client) => Shell::new(client),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        None | Some(Commands::Shell) => run_interactive(&shell),
        Some(Commands::Send { words }) => run_line(&shell, &words.join(" ")),
        Some(Commands::Pair) => run_line(&shell, "pair"),
        Some(Commands::Payload) => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run_line(shell: &Shell, line: &str) -> smartlamp::Result<()> {
    match ShellCommand::parse(line) {
        Ok(command) => print_lines(&shell.execute(command)?),
        Err(smartlamp::LampError::InvalidArgument(msg)) => println!("{}", msg),
        Err(e) => return Err(e),
    }
    Ok(())
}

fn run_interactive(shell: &Shell) -> smartlamp::Result<()> {
    println!("{}", HELP);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!(">> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;

        match ShellCommand::parse(&line) {
            Ok(ShellCommand::Exit) => return Ok(()),
            Ok(command) => match shell.execute(command) {
                Ok(output) => print_lines(&output),
                // Keep the prompt alive on transient socket errors
                Err(e) => println!("error: {}", e),
            },
            Err(smartlamp::LampError::InvalidArgument(msg)) => println!("{}", msg),
            Err(e) => return Err(e),
        }
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
