//! rstatsd - in-process runtime telemetry daemon.
//!
//! Samples process-level runtime metrics (thread count, heap and stack
//! memory) on an interval and ships each reading as a statsd gauge over
//! UDP. On shutdown every gauge is sent a final zero so dashboards do
//! not freeze at the last live value.

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use rstats_core::collector::{Collector, CollectorConfig, RealFs, SystemSampler};

mod statsd;
use statsd::StatsdSink;

/// In-process runtime telemetry daemon.
#[derive(Parser)]
#[command(name = "rstatsd", about = "Process runtime telemetry daemon", version)]
struct Args {
    /// statsd host:port to send gauges to.
    #[arg(short, long, default_value = "localhost:8125")]
    endpoint: String,

    /// Metric key prefix. An empty prefix selects the default "go".
    #[arg(short, long, default_value = "pillar")]
    prefix: String,

    /// Sample interval in seconds.
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Collect CPU statistics. Disable with --cpu=false.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    cpu: bool,

    /// Collect memory statistics. Disable with --mem=false.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    mem: bool,

    /// Collect GC statistics. Only takes effect while --mem is enabled.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    gc: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("rstatsd={}", level).parse().unwrap())
        .add_directive(format!("rstats_core={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    info!("rstatsd {} starting", env!("CARGO_PKG_VERSION"));

    // Surface a dead endpoint before the loop starts; everything after
    // this point is fire-and-forget.
    let sink = match StatsdSink::dial(&args.endpoint, &args.prefix) {
        Ok(sink) => sink,
        Err(e) => {
            error!("Cannot open statsd socket for {}: {}", args.endpoint, e);
            std::process::exit(1);
        }
    };

    info!(
        "Config: endpoint={}, prefix={}, interval={}s, cpu={}, mem={}, gc={}",
        args.endpoint,
        sink.prefix(),
        args.interval,
        args.cpu,
        args.mem,
        args.gc
    );
    if args.gc && !args.mem {
        warn!("GC statistics require --mem; no mem.gc.* gauges will be emitted");
    }

    let config = CollectorConfig {
        interval: Duration::from_secs(args.interval),
        enable_cpu: args.cpu,
        enable_mem: args.mem,
        enable_gc: args.gc,
    };

    // Keep a sender alive in main so a failed handler registration does
    // not tear the loop down through a disconnected channel.
    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let handler_tx = shutdown_tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        let _ = handler_tx.send(());
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let sampler = SystemSampler::new(RealFs::new(), "/proc");
    let collector = Collector::new(sampler, sink).with_config(config);

    info!("Starting collection loop");
    collector.run(shutdown_rx);
    drop(shutdown_tx);

    info!("Shutdown complete, gauges zeroed");
}
