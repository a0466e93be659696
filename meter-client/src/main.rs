mod acquisition;
mod config;
mod link;
mod sink;
mod window;

use crate::{
    acquisition::AcquisitionLoop,
    config::Config,
    link::SerialMeterLink,
    sink::{ConsoleSink, CsvSink, LiveViewSink},
};
use anyhow::Context;
use clap::Parser;
use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Telemetry client for USB power meters
#[derive(Parser, Debug)]
#[command(version, about = "Telemetry client for USB power meters", long_about = None)]
struct Args {
    /// Serial device the meter is reachable at, e.g. /dev/rfcomm0
    #[arg(long)]
    addr: String,

    /// Print a rolling summary of the recent sample window
    #[arg(long)]
    graph: bool,

    /// CSV file to write samples to. If it exists, it is overwritten
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load().context("failed to load configuration")?;

    info!(
        addr = %args.addr,
        baud = config.serial.baud_rate,
        timeout_ms = config.serial.timeout_ms,
        "connecting to meter"
    );

    let link = SerialMeterLink::open(&args.addr, config.serial.baud_rate, config.serial.timeout())
        .with_context(|| format!("failed to open {}", args.addr))?;

    let stop = Arc::new(AtomicBool::new(false));
    let mut acquisition = AcquisitionLoop::new(
        link,
        stop.clone(),
        config.acquisition.poll_delay(),
        config.acquisition.window_capacity,
    );

    acquisition.add_sink(Box::new(ConsoleSink));
    if let Some(path) = &args.out {
        acquisition.add_sink(Box::new(CsvSink::create(path)?));
    }
    if args.graph {
        acquisition.add_sink(Box::new(LiveViewSink::new(
            config.acquisition.window_capacity,
        )));
    }

    // The loop is synchronous and blocking; run it off the runtime and use
    // the async side only to watch for Ctrl+C.
    let mut worker = tokio::task::spawn_blocking(move || acquisition.run());

    tokio::select! {
        outcome = &mut worker => outcome??,
        _ = tokio::signal::ctrl_c() => {
            info!("ctrl-c received, shutting down");
            stop.store(true, Ordering::Relaxed);
            worker.await??;
        }
    }

    info!("session closed");
    Ok(())
}
