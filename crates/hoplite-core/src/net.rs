use crate::error::Result;
use crate::probe::{EchoProbe, EchoResponse, HopReply};
use crate::types::TimeToLive;
use std::time::Duration;

/// IPv4 implementation.
mod ipv4;

/// Platform specific network code.
mod platform;

/// A network socket.
mod socket;

/// Channels for sending and receiving probes.
pub mod channel;

/// The platform specific socket type.
pub use platform::SocketImpl;

/// An abstraction over a network interface for pinging.
#[cfg_attr(test, mockall::automock)]
pub trait PingNetwork {
    /// Send an `EchoProbe`.
    fn send_probe(&mut self, probe: EchoProbe) -> Result<()>;

    /// Receive the next ICMP packet and return an `EchoResponse`.
    ///
    /// Returns `None` if the read times out or the packet read is not an echo
    /// reply.
    fn recv_reply(&mut self, timeout: Duration) -> Result<Option<EchoResponse>>;
}

/// An abstraction over a network interface for tracing.
#[cfg_attr(test, mockall::automock)]
pub trait TraceNetwork {
    /// Send a single UDP probe with the given time to live and await the
    /// ICMP response.
    ///
    /// Returns `None` if no response arrives within the query timeout.
    fn query_hop(&mut self, ttl: TimeToLive) -> Result<Option<HopReply>>;
}
