#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::option_if_let_else,
    clippy::missing_const_for_fn,
    clippy::cast_precision_loss
)]
#![forbid(unsafe_code)]

use crate::args::{Args, Command, PingArgs, TraceArgs};
use anyhow::Context;
use clap::Parser;
use hoplite_core::{
    random_probe_id, Error, PayloadPattern, PayloadSize, PingConfig, Pinger, Port, ProbeCount,
    Queries, TimeToLive, TraceConfig, Tracer,
};
use hoplite_dns::{Resolver, SystemResolver};
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod args;
mod report;

/// The log filter used when verbose logging is enabled and `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "hoplite=debug,hoplite_core=debug,hoplite_dns=debug";

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    configure_logging(args.verbose);
    match args.command {
        Command::Ping(args) => run_ping(&args),
        Command::Trace(args) => run_trace(&args),
    }
}

/// Run a ping session and print each outcome as it completes.
fn run_ping(args: &PingArgs) -> anyhow::Result<()> {
    let resolver = SystemResolver::new();
    let target_addr = resolve_target(&resolver, &args.target)?;
    let config = PingConfig {
        target_addr,
        identifier: random_probe_id(),
        count: args.count.map(ProbeCount),
        interval: Duration::try_from_secs_f64(args.interval).context("invalid interval")?,
        probe_timeout: Duration::try_from_secs_f64(args.timeout).context("invalid timeout")?,
        deadline: args
            .deadline
            .map(|deadline| Duration::try_from_secs_f64(deadline).context("invalid deadline"))
            .transpose()?,
        payload_size: PayloadSize(args.size),
        payload_pattern: PayloadPattern(args.pattern),
    };
    report::print_ping_header(&args.target, target_addr);
    let summary = Pinger::new(&config, report::print_probe_outcome)
        .ping()
        .map_err(describe)?;
    report::print_ping_report(&summary);
    Ok(())
}

/// Run a traceroute session and print each hop as it completes.
fn run_trace(args: &TraceArgs) -> anyhow::Result<()> {
    let resolver = SystemResolver::new();
    let target_addr = resolve_target(&resolver, &args.target)?;
    let config = TraceConfig {
        target_addr,
        max_ttl: TimeToLive(args.max_ttl),
        queries: Queries(args.queries),
        query_timeout: Duration::try_from_secs_f64(args.wait).context("invalid wait")?,
        port: Port(args.port),
        numeric: args.numeric,
    };
    report::print_trace_header(&args.target, target_addr, config.max_ttl);
    let summary = args.summary;
    Tracer::new(
        &config,
        |hop| report::print_hop(hop, summary),
        |addr| {
            resolver
                .reverse_lookup(addr)
                .hostname()
                .map(ToOwned::to_owned)
        },
    )
    .map_err(describe)?
    .trace()
    .map_err(describe)?;
    Ok(())
}

/// Resolve a target given as a hostname or an IPv4 address.
///
/// A target which parses as an IPv4 address is used as given, anything
/// else is forward resolved and the first IPv4 address is used.
fn resolve_target<R: Resolver>(resolver: &R, target: &str) -> anyhow::Result<Ipv4Addr> {
    if let Ok(addr) = Ipv4Addr::from_str(target) {
        return Ok(addr);
    }
    resolver
        .lookup(target)
        .context("Cannot resolve host")?
        .into_iter()
        .next()
        .context("Cannot resolve host")
}

/// Attach user facing context to probe errors where the cause is actionable.
fn describe(err: Error) -> anyhow::Error {
    match err {
        err @ Error::SocketCreation(_) => anyhow::Error::from(err)
            .context("raw sockets require root or the CAP_NET_RAW capability"),
        err => anyhow::Error::from(err),
    }
}

fn configure_logging(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
            )
            .compact()
            .init();
    }
}
