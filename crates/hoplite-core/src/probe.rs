use crate::types::{ProbeId, Sequence};
use std::net::IpAddr;
use std::time::{Duration, SystemTime};

/// Represents an echo probe which has been sent to the target.
///
/// An `EchoProbe` is an ICMP echo request sent across the network to the
/// target host.  It carries the session identifier and the sequence number
/// which together identify the matching echo reply.
///
/// # Examples
///
/// Creating a probe:
///
/// ```
/// use hoplite_core::{EchoProbe, ProbeId, Sequence};
/// use std::time::SystemTime;
///
/// let probe = EchoProbe::new(ProbeId(1234), Sequence(1), SystemTime::now());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoProbe {
    /// The session identifier.
    pub identifier: ProbeId,
    /// The sequence of the probe.
    pub sequence: Sequence,
    /// Timestamp when the probe was sent.
    pub sent: SystemTime,
}

impl EchoProbe {
    #[must_use]
    pub const fn new(identifier: ProbeId, sequence: Sequence, sent: SystemTime) -> Self {
        Self {
            identifier,
            sequence,
            sent,
        }
    }

    /// A matching reply has been received and the probe is now complete.
    #[must_use]
    pub const fn complete(self, responder: IpAddr, received: SystemTime) -> EchoReply {
        EchoReply {
            identifier: self.identifier,
            sequence: self.sequence,
            sent: self.sent,
            received,
            responder,
        }
    }
}

/// Represents an echo probe which has received a matching reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoReply {
    /// The session identifier.
    pub identifier: ProbeId,
    /// The sequence of the probe.
    pub sequence: Sequence,
    /// Timestamp when the probe was sent.
    pub sent: SystemTime,
    /// Timestamp when the reply was received.
    pub received: SystemTime,
    /// The address of the replying host.
    pub responder: IpAddr,
}

impl EchoReply {
    /// The round trip time of the probe.
    ///
    /// Zero if the clock stepped backwards between send and receive.
    #[must_use]
    pub fn round_trip(&self) -> Duration {
        self.received.duration_since(self.sent).unwrap_or_default()
    }
}

/// The outcome of a single echo probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A matching reply arrived within the probe timeout.
    Reply(EchoReply),
    /// No matching reply arrived within the probe timeout.
    TimedOut(EchoProbe),
}

/// A decoded inbound ICMP echo reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoResponse {
    /// Timestamp when the reply was received.
    pub recv: SystemTime,
    /// The address of the replying host.
    pub addr: IpAddr,
    /// The identifier from the echo reply.
    pub identifier: ProbeId,
    /// The sequence from the echo reply.
    pub sequence: Sequence,
}

impl EchoResponse {
    #[must_use]
    pub const fn new(
        recv: SystemTime,
        addr: IpAddr,
        identifier: ProbeId,
        sequence: Sequence,
    ) -> Self {
        Self {
            recv,
            addr,
            identifier,
            sequence,
        }
    }
}

/// A classification of an inbound ICMP datagram.
///
/// Recorded for reporting only; it plays no part in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// `TimeExceeded` (type 11).
    TimeExceeded,
    /// `DestinationUnreachable` (type 3).
    DestinationUnreachable,
    /// `EchoReply` (type 0).
    EchoReply,
    /// Any other ICMP type.
    Other(u8),
}

/// A decoded inbound ICMP datagram observed during a traceroute query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopResponse {
    /// Timestamp when the datagram was received.
    pub recv: SystemTime,
    /// The address of the host which sent the datagram.
    pub addr: IpAddr,
    /// The response classification.
    pub kind: ResponseKind,
}

impl HopResponse {
    #[must_use]
    pub const fn new(recv: SystemTime, addr: IpAddr, kind: ResponseKind) -> Self {
        Self { recv, addr, kind }
    }
}

/// The reply to a single traceroute query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopReply {
    /// The address of the host which answered the query.
    pub addr: IpAddr,
    /// The round trip time of the query.
    pub round_trip: Duration,
    /// The response classification.
    pub kind: ResponseKind,
}

impl HopReply {
    #[must_use]
    pub const fn new(addr: IpAddr, round_trip: Duration, kind: ResponseKind) -> Self {
        Self {
            addr,
            round_trip,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_probe_complete() {
        let sent = SystemTime::now();
        let received = sent + Duration::from_millis(25);
        let responder = IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4));
        let probe = EchoProbe::new(ProbeId(1234), Sequence(7), sent);
        let reply = probe.complete(responder, received);
        assert_eq!(reply.identifier, ProbeId(1234));
        assert_eq!(reply.sequence, Sequence(7));
        assert_eq!(reply.sent, sent);
        assert_eq!(reply.received, received);
        assert_eq!(reply.responder, responder);
        assert_eq!(reply.round_trip(), Duration::from_millis(25));
    }

    #[test]
    fn test_round_trip_clock_stepped_backwards() {
        let sent = SystemTime::now();
        let received = sent - Duration::from_millis(25);
        let probe = EchoProbe::new(ProbeId(1234), Sequence(7), sent);
        let reply = probe.complete(IpAddr::V4(Ipv4Addr::LOCALHOST), received);
        assert_eq!(reply.round_trip(), Duration::ZERO);
    }
}
