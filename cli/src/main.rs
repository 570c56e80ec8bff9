use std::io::IsTerminal;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod armor;
mod dump;
mod error;
mod header;
mod output;
mod status;
mod strip;
mod tree;
mod utils;

use error::Result;
use status::Status;

#[derive(Parser)]
#[command(name = "certalize")]
#[command(about = "Inspect the DER structure of X.509 certificates", long_about = None)]
struct Cli {
    /// Log pipeline steps to stderr (-v debug, -vv trace). Overrides RUST_LOG
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hex dump of the certificate's DER bytes
    Dump {
        #[command(flatten)]
        config: dump::Config,
    },
    /// Decode the TLV tree of the certificate
    Tree {
        #[command(flatten)]
        config: tree::Config,
    },
    /// Decode a single TLV header
    Header {
        #[command(flatten)]
        config: header::Config,
    },
    /// Print the Base64 payload of a PEM certificate
    Strip {
        #[command(flatten)]
        config: strip::Config,
    },
    /// Wrap a certificate in PEM armor
    Armor {
        #[command(flatten)]
        config: armor::Config,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                Status::Invalid
            } else {
                Status::Success
            }
            .into();
        }
    };

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("certalize: cannot initialize logging: {e}");
        return Status::InitFailure.into();
    }

    match run(cli.command) {
        Ok(()) => Status::Success.into(),
        Err(e) => {
            eprintln!("certalize: {e}");
            Status::from(&e).into()
        }
    }
}

fn init_tracing(verbose: u8) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?,
        1 => EnvFilter::try_new("debug")?,
        _ => EnvFilter::try_new("trace")?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init()
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Dump { config } => dump::execute(config),
        Commands::Tree { config } => tree::execute(config),
        Commands::Header { config } => header::execute(config),
        Commands::Strip { config } => strip::execute(config),
        Commands::Armor { config } => armor::execute(config),
    }
}
