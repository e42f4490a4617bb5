use clap::{Parser, Subcommand};
use hoplite_core::defaults;
use std::num::NonZeroUsize;

/// A sequential ping and traceroute tool.
#[derive(Parser, Debug)]
#[command(name = "hoplite", version, about)]
pub struct Args {
    /// The command to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// The available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send ICMP echo requests to a target and report round trip times.
    Ping(PingArgs),
    /// Discover the path to a target with UDP probes of increasing time to live.
    Trace(TraceArgs),
}

/// Arguments for the `ping` command.
#[derive(clap::Args, Debug)]
pub struct PingArgs {
    /// The hostname or IPv4 address to ping.
    pub target: String,

    /// The number of echo requests to send.
    ///
    /// If not given probes are sent until interrupted.
    #[arg(short, long)]
    pub count: Option<NonZeroUsize>,

    /// The interval between probes, in seconds.
    #[arg(short, long, default_value_t = defaults::DEFAULT_PROBE_INTERVAL.as_secs_f64())]
    pub interval: f64,

    /// The time to wait for each reply, in seconds.
    #[arg(short = 'W', long, default_value_t = defaults::DEFAULT_PROBE_TIMEOUT.as_secs_f64())]
    pub timeout: f64,

    /// The time limit for the whole session, in seconds.
    #[arg(short = 'w', long)]
    pub deadline: Option<f64>,

    /// The number of payload bytes to send.
    #[arg(short = 's', long, default_value_t = defaults::DEFAULT_PAYLOAD_SIZE)]
    pub size: u16,

    /// The byte value used to fill the payload.
    #[arg(long, default_value_t = defaults::DEFAULT_PAYLOAD_PATTERN)]
    pub pattern: u8,
}

/// Arguments for the `trace` command.
#[derive(clap::Args, Debug)]
pub struct TraceArgs {
    /// The hostname or IPv4 address to trace.
    pub target: String,

    /// Print hop addresses numerically rather than by hostname.
    #[arg(short, long)]
    pub numeric: bool,

    /// The number of probes to send per hop.
    #[arg(short, long, default_value_t = defaults::DEFAULT_QUERIES)]
    pub queries: u8,

    /// The maximum time to live to probe.
    #[arg(short, long, default_value_t = defaults::DEFAULT_MAX_TTL)]
    pub max_ttl: u8,

    /// The time to wait for each response, in seconds.
    #[arg(short, long, default_value_t = defaults::DEFAULT_QUERY_TIMEOUT.as_secs_f64())]
    pub wait: f64,

    /// The base UDP destination port.
    #[arg(short, long, default_value_t = defaults::DEFAULT_TRACE_PORT)]
    pub port: u16,

    /// Print the count of unanswered probes for each hop.
    #[arg(short = 'S', long)]
    pub summary: bool,
}
