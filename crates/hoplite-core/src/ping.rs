use crate::config::PingConfig;
use crate::error::Result;
use crate::net::channel::PingChannel;
use crate::net::{PingNetwork, SocketImpl};
use crate::probe::{EchoProbe, EchoResponse, ProbeOutcome};
use crate::types::{ProbeId, Sequence};
use std::net::Ipv4Addr;
use std::time::{Duration, Instant, SystemTime};
use tracing::instrument;

/// Round trip statistics for a completed ping session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RoundTripStats {
    /// The smallest round trip time observed.
    pub min: Duration,
    /// The mean round trip time over all replies.
    pub mean: Duration,
    /// The largest round trip time observed.
    pub max: Duration,
}

/// A summary of a completed ping session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PingReport {
    /// The target of the session.
    pub target: Ipv4Addr,
    /// The number of echo requests sent.
    pub sent: usize,
    /// The number of echo replies received.
    pub received: usize,
    /// Round trip statistics, `None` if no reply was received.
    pub rtt: Option<RoundTripStats>,
}

impl PingReport {
    /// The percentage of probes which went unanswered.
    ///
    /// `None` if no probes were sent.
    #[must_use]
    pub fn loss_percent(&self) -> Option<f64> {
        if self.sent == 0 {
            None
        } else {
            Some(((self.sent - self.received) as f64 / self.sent as f64) * 100.0)
        }
    }
}

/// Determine if an echo response belongs to the session with the given identifier.
///
/// Only the identifier is compared.  The sequence number is not checked and
/// so a reply which arrives after its probe has timed out will complete a
/// later probe in the same session.
#[must_use]
pub const fn matches_session(response: &EchoResponse, identifier: ProbeId) -> bool {
    response.identifier.0 == identifier.0
}

/// An `ICMP` echo prober.
///
/// Sends a fixed or unbounded number of `ICMP` `EchoRequest` probes to a
/// target, one at a time, and awaits the matching `EchoReply` for each
/// before moving on to the next.
pub struct Pinger<F> {
    /// The ping session configuration.
    config: PingConfig,
    /// The function to publish the outcome of each probe.
    publish: F,
}

impl<F: Fn(&ProbeOutcome)> Pinger<F> {
    /// Create a new [`Pinger`].
    #[instrument(skip_all, level = "trace")]
    pub fn new(config: &PingConfig, publish: F) -> Self {
        tracing::debug!(?config);
        Self {
            config: *config,
            publish,
        }
    }

    /// Run the ping session and return a summary report.
    ///
    /// This operation requires the `CAP_NET_RAW` capability on Linux.
    #[instrument(skip_all, level = "trace")]
    pub fn ping(&self) -> Result<PingReport> {
        let channel = PingChannel::<SocketImpl>::connect(&self.config)?;
        self.ping_with(channel)
    }

    /// Run the ping session over the given network.
    pub fn ping_with<N: PingNetwork>(&self, mut network: N) -> Result<PingReport> {
        let mut stats = Statistics::default();
        let mut sequence = Sequence(1);
        let deadline = self.config.deadline.map(|limit| Instant::now() + limit);
        while self.session_active(&stats, deadline) {
            let outcome = self.probe(&mut network, sequence, deadline)?;
            stats.record(&outcome);
            (self.publish)(&outcome);
            sequence = sequence.wrapping_next();
            if self.session_active(&stats, deadline) {
                std::thread::sleep(self.config.interval);
            }
        }
        Ok(stats.report(self.config.target_addr))
    }

    /// Send a single echo request and await the matching reply.
    ///
    /// Echo replies which do not carry the session identifier are discarded
    /// and the probe keeps waiting until its time budget is exhausted.  The
    /// budget is the probe timeout, reduced to whatever remains of the
    /// session deadline when one is set.
    #[instrument(skip(self, network), level = "trace")]
    fn probe<N: PingNetwork>(
        &self,
        network: &mut N,
        sequence: Sequence,
        deadline: Option<Instant>,
    ) -> Result<ProbeOutcome> {
        let probe = EchoProbe::new(self.config.identifier, sequence, SystemTime::now());
        network.send_probe(probe)?;
        let budget = deadline.map_or(self.config.probe_timeout, |deadline| {
            self.config
                .probe_timeout
                .min(deadline.saturating_duration_since(Instant::now()))
        });
        let probe_deadline = Instant::now() + budget;
        loop {
            let remaining = probe_deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(ProbeOutcome::TimedOut(probe));
            }
            match network.recv_reply(remaining)? {
                Some(resp) if matches_session(&resp, self.config.identifier) => {
                    return Ok(ProbeOutcome::Reply(probe.complete(resp.addr, resp.recv)));
                }
                Some(resp) => {
                    tracing::debug!(?resp);
                }
                None => {}
            }
        }
    }

    /// Determine if the session should send another probe.
    fn session_active(&self, stats: &Statistics, deadline: Option<Instant>) -> bool {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return false;
        }
        self.config
            .count
            .map_or(true, |count| stats.sent < count.0.get())
    }
}

/// Running counters for a ping session.
#[derive(Debug, Copy, Clone, Default)]
struct Statistics {
    sent: usize,
    received: usize,
    min: Duration,
    max: Duration,
    total: Duration,
}

impl Statistics {
    /// Record the outcome of a single probe.
    fn record(&mut self, outcome: &ProbeOutcome) {
        self.sent += 1;
        if let ProbeOutcome::Reply(reply) = outcome {
            let round_trip = reply.round_trip();
            if self.received == 0 || round_trip < self.min {
                self.min = round_trip;
            }
            if round_trip > self.max {
                self.max = round_trip;
            }
            self.total += round_trip;
            self.received += 1;
        }
    }

    /// Summarize the session against the given target.
    fn report(&self, target: Ipv4Addr) -> PingReport {
        let rtt = (self.received > 0).then(|| RoundTripStats {
            min: self.min,
            mean: self.total / self.received as u32,
            max: self.max,
        });
        PingReport {
            target,
            sent: self.sent,
            received: self.received,
            rtt,
        }
    }
}
