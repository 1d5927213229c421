use std::{net::SocketAddr, time::Duration};

use clap::{Args, Parser, Subcommand};
use eeg_bridge::prelude::*;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "eeg-bridge", version, about = "Serve the latest EEG headset reading as JSON over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Commands
}

#[derive(Args, Debug)]
struct BridgeArgs {
    /// Address to serve readings on
    #[arg(long, env = "EEG_BRIDGE_BIND", default_value = "127.0.0.1:8080")]
    bind:        SocketAddr,
    /// Milliseconds between decoder polls
    #[arg(long, env = "EEG_BRIDGE_INTERVAL_MS", default_value = "700",
          value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,
    /// Polls without a new reading before logging a stale streak (0 disables)
    #[arg(long, default_value = "50")]
    stale_after: u32
}

impl From<BridgeArgs> for BridgeConfig {
    fn from(args: BridgeArgs) -> Self {
        BridgeConfig::new(args.bind)
            .with_poll_interval(Duration::from_millis(args.interval_ms))
            .with_stale_after(args.stale_after)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bridge the headset through libThnkrEegDecoder
    #[cfg(feature = "native-decoder")]
    Serve {
        #[command(flatten)]
        bridge: BridgeArgs
    },
    /// Bridge a simulated headset, for working on clients without hardware
    Simulate {
        #[command(flatten)]
        bridge:      BridgeArgs,
        /// Fraction of polls that report no new reading (0.0 - 1.0)
        #[arg(long, default_value = "0.0")]
        empty_ratio: f64,
        /// Seed for a reproducible reading sequence
        #[arg(long)]
        seed:        Option<u64>
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl-C, shutting down...");
}

async fn run_bridge<S: ReadingSource + 'static>(bridge: Bridge<S>) -> Result<(), BridgeError> {
    bridge.start(shutdown_signal()).await
}

fn init_logging() {
    #[cfg(feature = "console")]
    {
        console_subscriber::init();
    }

    #[cfg(not(feature = "console"))]
    {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

#[tokio::main]
async fn main() {
    // logging
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        #[cfg(feature = "native-decoder")]
        Commands::Serve { bridge } => {
            let bridge = Bridge::new(NativeDecoder::new(), bridge.into());
            run_bridge(bridge).await
        }
        Commands::Simulate { bridge, empty_ratio, seed } => {
            let headset = match seed {
                Some(seed) => SimulatedHeadset::seeded("simulated", seed),
                None => SimulatedHeadset::new("simulated")
            };
            let bridge = Bridge::new(headset.with_empty_ratio(empty_ratio), bridge.into());
            run_bridge(bridge).await
        }
    };

    // exit here rather than dropping the runtime, which would wait on a decoder call that never returns
    match result {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
