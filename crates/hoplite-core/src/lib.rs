//! Hoplite - A sequential ping and traceroute library.
//!
//! This crate provides the probing engines used by the standalone `hoplite`
//! application.
//!
//! Two engines are provided.  The [`Pinger`] sends `ICMP` `EchoRequest`
//! probes to a target, one at a time, and reports the round trip time of
//! each reply along with summary statistics.  The [`Tracer`] discovers the
//! path to a target by sending `UDP` probes with increasing time to live
//! values and recording which host answers for each.
//!
//! Both engines publish results through a caller supplied closure as the
//! session runs and so partial results are available before the session
//! completes.
//!
//! # Examples
//!
//! The following example pings a target with the default configuration and
//! prints the outcome of each probe followed by the summary report:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! # use std::net::Ipv4Addr;
//! # use std::str::FromStr;
//! use hoplite_core::{PingConfig, Pinger};
//!
//! let config = PingConfig {
//!     target_addr: Ipv4Addr::from_str("1.1.1.1")?,
//!     ..Default::default()
//! };
//! let report = Pinger::new(&config, |outcome| println!("{outcome:?}")).ping()?;
//! println!("{report:?}");
//! # Ok(())
//! # }
//! ```
//!
//! The following example traces the path to a target and prints each hop as
//! it is probed:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! # use std::net::Ipv4Addr;
//! # use std::str::FromStr;
//! use hoplite_core::{TraceConfig, Tracer};
//!
//! let config = TraceConfig {
//!     target_addr: Ipv4Addr::from_str("1.1.1.1")?,
//!     ..Default::default()
//! };
//! Tracer::new(&config, |hop| println!("{hop:?}"), |_| None)?.trace()?;
//! # Ok(())
//! # }
//! ```
//!
//! # See Also
//!
//! - [`Pinger::ping`] - Run a ping session on the current thread.
//! - [`Tracer::trace`] - Run a trace on the current thread.
//! - [`PingConfig`] - Configure a ping session.
//! - [`TraceConfig`] - Configure a trace.
#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::use_self,
    clippy::option_if_let_else,
    clippy::missing_const_for_fn,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]
#![deny(unsafe_code)]

mod config;
mod error;
mod net;
mod ping;
mod probe;
mod trace;
mod types;

pub use config::{defaults, random_probe_id, PingConfig, TraceConfig};
pub use error::{Error, Result};
pub use ping::{matches_session, PingReport, Pinger, RoundTripStats};
pub use probe::{EchoProbe, EchoReply, EchoResponse, ProbeOutcome, ResponseKind};
pub use trace::{Hop, Query, QueryAnswer, TraceReport, Tracer};
pub use types::{
    PayloadPattern, PayloadSize, Port, ProbeCount, ProbeId, Queries, Sequence, TimeToLive,
};
