use crate::config::TraceConfig;
use crate::error::{Error, Result};
use crate::net::channel::TraceChannel;
use crate::net::{SocketImpl, TraceNetwork};
use crate::probe::ResponseKind;
use crate::types::TimeToLive;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tracing::instrument;

/// The outcome of a single query to a hop.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Query {
    /// A response was received for the query.
    Answered(QueryAnswer),
    /// No response arrived within the query timeout.
    Unanswered,
}

/// A response to a single hop query.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct QueryAnswer {
    /// The address of the responding host.
    pub responder: IpAddr,
    /// The hostname of the responding host, if resolved.
    pub name: Option<String>,
    /// The round trip time of the query.
    pub round_trip: Duration,
    /// The kind of response received.
    pub kind: ResponseKind,
}

/// The queries sent for a single time to live.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Hop {
    /// The time to live probed.
    pub ttl: TimeToLive,
    /// The outcome of every query for this hop, in the order sent.
    pub queries: Vec<Query>,
}

impl Hop {
    /// The number of queries which went unanswered.
    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.queries
            .iter()
            .filter(|query| matches!(query, Query::Unanswered))
            .count()
    }

    /// The responder to the most recent answered query, if any.
    #[must_use]
    pub fn last_responder(&self) -> Option<IpAddr> {
        self.queries.iter().rev().find_map(|query| match query {
            Query::Answered(answer) => Some(answer.responder),
            Query::Unanswered => None,
        })
    }
}

/// A summary of a completed trace.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TraceReport {
    /// The target of the trace.
    pub target: Ipv4Addr,
    /// The hops probed, in time to live order.
    pub hops: Vec<Hop>,
}

/// A `UDP` traceroute prober.
///
/// Probes each time to live in turn, sending a fixed number of queries per
/// hop, until the target answers or the maximum time to live is reached.
pub struct Tracer<F, R> {
    /// The trace configuration.
    config: TraceConfig,
    /// The function to publish each completed hop.
    publish: F,
    /// The function to resolve a responder address to a hostname.
    resolve: R,
}

impl<F: Fn(&Hop), R: Fn(IpAddr) -> Option<String>> Tracer<F, R> {
    /// Create a new [`Tracer`].
    ///
    /// # Errors
    ///
    /// Returns `Error::BadConfig` if the configuration is invalid.
    #[instrument(skip_all, level = "trace")]
    pub fn new(config: &TraceConfig, publish: F, resolve: R) -> Result<Self> {
        tracing::debug!(?config);
        validate(config)?;
        Ok(Self {
            config: *config,
            publish,
            resolve,
        })
    }

    /// Run the trace and return the hops probed.
    ///
    /// This operation requires the `CAP_NET_RAW` capability on Linux.
    #[instrument(skip_all, level = "trace")]
    pub fn trace(&self) -> Result<TraceReport> {
        self.trace_with(TraceChannel::<SocketImpl>::new(&self.config))
    }

    /// Run the trace over the given network.
    pub fn trace_with<N: TraceNetwork>(&self, mut network: N) -> Result<TraceReport> {
        let mut hops = Vec::new();
        let mut ttl = TimeToLive(1);
        loop {
            let hop = self.probe_hop(&mut network, ttl)?;
            (self.publish)(&hop);
            let target_reached =
                hop.last_responder() == Some(IpAddr::V4(self.config.target_addr));
            hops.push(hop);
            if target_reached || ttl >= self.config.max_ttl {
                break;
            }
            ttl += TimeToLive(1);
        }
        Ok(TraceReport {
            target: self.config.target_addr,
            hops,
        })
    }

    /// Send every query for a single time to live.
    ///
    /// A query which fails with an io error is recorded as unanswered and the
    /// hop continues.  A failure to create the sockets is fatal as no later
    /// query could succeed either.
    #[instrument(skip(self, network), level = "trace")]
    fn probe_hop<N: TraceNetwork>(&self, network: &mut N, ttl: TimeToLive) -> Result<Hop> {
        let mut queries = Vec::with_capacity(usize::from(self.config.queries.0));
        for _ in 0..self.config.queries.0 {
            let query = match network.query_hop(ttl) {
                Ok(Some(reply)) => {
                    let name = if self.config.numeric {
                        None
                    } else {
                        (self.resolve)(reply.addr)
                    };
                    Query::Answered(QueryAnswer {
                        responder: reply.addr,
                        name,
                        round_trip: reply.round_trip,
                        kind: reply.kind,
                    })
                }
                Ok(None) => Query::Unanswered,
                Err(err @ Error::SocketCreation(_)) => return Err(err),
                Err(err) => {
                    tracing::debug!(?err);
                    Query::Unanswered
                }
            };
            queries.push(query);
        }
        Ok(Hop { ttl, queries })
    }
}

/// Validate the trace configuration.
fn validate(config: &TraceConfig) -> Result<()> {
    if config.queries.0 == 0 {
        return Err(Error::BadConfig("queries may not be zero".to_string()));
    }
    if config.max_ttl.0 == 0 {
        return Err(Error::BadConfig("max_ttl may not be zero".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IoError, IoOperation};
    use crate::net::MockTraceNetwork;
    use crate::probe::HopReply;
    use crate::types::Queries;
    use std::cell::RefCell;
    use std::io::ErrorKind;

    // Simulate a trace which reaches the target at hop 5.  Each intermediate
    // hop answers with time exceeded and the target answers with destination
    // unreachable.  No query is sent for the time to live beyond the target.
    #[test]
    fn test_trace_target_found() {
        let target_addr = Ipv4Addr::new(5, 6, 7, 8);
        let config = TraceConfig {
            target_addr,
            queries: Queries(1),
            ..Default::default()
        };
        let mut network = MockTraceNetwork::new();
        network.expect_query_hop().times(5).returning(move |ttl| {
            let reply = if ttl == TimeToLive(5) {
                HopReply::new(
                    IpAddr::V4(target_addr),
                    Duration::from_millis(30),
                    ResponseKind::DestinationUnreachable,
                )
            } else {
                HopReply::new(
                    IpAddr::V4(Ipv4Addr::new(10, 0, 0, ttl.0)),
                    Duration::from_millis(10),
                    ResponseKind::TimeExceeded,
                )
            };
            Ok(Some(reply))
        });

        let published = RefCell::new(Vec::new());
        let tracer = Tracer::new(
            &config,
            |hop: &Hop| published.borrow_mut().push(hop.clone()),
            |_| None,
        )
        .unwrap();
        let report = tracer.trace_with(network).unwrap();
        assert_eq!(report.target, target_addr);
        assert_eq!(report.hops.len(), 5);
        assert_eq!(report.hops[0].ttl, TimeToLive(1));
        assert_eq!(
            report.hops[0].last_responder(),
            Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)))
        );
        assert_eq!(report.hops[4].ttl, TimeToLive(5));
        assert_eq!(report.hops[4].last_responder(), Some(IpAddr::V4(target_addr)));
        assert!(matches!(
            &report.hops[4].queries[0],
            Query::Answered(answer) if answer.kind == ResponseKind::DestinationUnreachable
        ));
        assert_eq!(published.into_inner().len(), 5);
    }

    // Simulate a trace where the target is never reached.  The trace stops
    // after the maximum time to live and the silent hop shows every query
    // unanswered.
    #[test]
    fn test_trace_max_ttl_reached() {
        let config = TraceConfig {
            target_addr: Ipv4Addr::new(5, 6, 7, 8),
            max_ttl: TimeToLive(4),
            queries: Queries(3),
            ..Default::default()
        };
        let mut network = MockTraceNetwork::new();
        network.expect_query_hop().times(12).returning(|ttl| {
            if ttl == TimeToLive(3) {
                Ok(None)
            } else {
                Ok(Some(HopReply::new(
                    IpAddr::V4(Ipv4Addr::new(10, 0, 0, ttl.0)),
                    Duration::from_millis(10),
                    ResponseKind::TimeExceeded,
                )))
            }
        });

        let tracer = Tracer::new(&config, |_| {}, |_| None).unwrap();
        let report = tracer.trace_with(network).unwrap();
        assert_eq!(report.hops.len(), 4);
        assert_eq!(report.hops[2].unanswered(), 3);
        assert_eq!(report.hops[2].last_responder(), None);
        assert_eq!(report.hops[3].unanswered(), 0);
    }

    // An io error for one query is recorded as unanswered and the trace
    // continues with the next query.
    #[test]
    fn test_trace_query_error_recorded_unanswered() {
        let config = TraceConfig {
            target_addr: Ipv4Addr::new(5, 6, 7, 8),
            max_ttl: TimeToLive(1),
            queries: Queries(2),
            ..Default::default()
        };
        let mut network = MockTraceNetwork::new();
        let mut seq = mockall::Sequence::new();
        network
            .expect_query_hop()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(Error::Io(IoError::Other(
                    std::io::Error::from(ErrorKind::AddrNotAvailable),
                    IoOperation::Select,
                )))
            });
        network
            .expect_query_hop()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(Some(HopReply::new(
                    IpAddr::V4(Ipv4Addr::new(5, 6, 7, 8)),
                    Duration::from_millis(10),
                    ResponseKind::DestinationUnreachable,
                )))
            });

        let tracer = Tracer::new(&config, |_| {}, |_| None).unwrap();
        let report = tracer.trace_with(network).unwrap();
        assert_eq!(report.hops.len(), 1);
        assert_eq!(report.hops[0].queries.len(), 2);
        assert!(matches!(report.hops[0].queries[0], Query::Unanswered));
        assert!(matches!(report.hops[0].queries[1], Query::Answered(_)));
    }

    // A socket creation failure is fatal as no later query could succeed.
    #[test]
    fn test_trace_socket_error_fatal() {
        let config = TraceConfig {
            target_addr: Ipv4Addr::new(5, 6, 7, 8),
            ..Default::default()
        };
        let mut network = MockTraceNetwork::new();
        network.expect_query_hop().times(1).returning(|_| {
            Err(Error::SocketCreation(IoError::Other(
                std::io::Error::from(ErrorKind::PermissionDenied),
                IoOperation::NewSocket,
            )))
        });

        let tracer = Tracer::new(&config, |_| {}, |_| None).unwrap();
        let err = tracer.trace_with(network).unwrap_err();
        assert!(matches!(err, Error::SocketCreation(_)));
    }

    // The resolver must not be called when numeric mode is set.
    #[test]
    fn test_trace_numeric_skips_resolver() {
        let config = TraceConfig {
            target_addr: Ipv4Addr::new(5, 6, 7, 8),
            max_ttl: TimeToLive(1),
            queries: Queries(1),
            numeric: true,
            ..Default::default()
        };
        let mut network = MockTraceNetwork::new();
        network.expect_query_hop().times(1).returning(|_| {
            Ok(Some(HopReply::new(
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
                Duration::from_millis(10),
                ResponseKind::TimeExceeded,
            )))
        });

        let tracer = Tracer::new(&config, |_| {}, |_: IpAddr| -> Option<String> {
            panic!("resolved in numeric mode")
        })
        .unwrap();
        let report = tracer.trace_with(network).unwrap();
        assert!(matches!(
            &report.hops[0].queries[0],
            Query::Answered(answer) if answer.name.is_none()
        ));
    }

    #[test]
    fn test_trace_resolved_name() {
        let config = TraceConfig {
            target_addr: Ipv4Addr::new(5, 6, 7, 8),
            max_ttl: TimeToLive(1),
            queries: Queries(1),
            ..Default::default()
        };
        let mut network = MockTraceNetwork::new();
        network.expect_query_hop().times(1).returning(|_| {
            Ok(Some(HopReply::new(
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
                Duration::from_millis(10),
                ResponseKind::TimeExceeded,
            )))
        });

        let tracer = Tracer::new(&config, |_| {}, |addr: IpAddr| Some(format!("host-{addr}")))
            .unwrap();
        let report = tracer.trace_with(network).unwrap();
        assert!(matches!(
            &report.hops[0].queries[0],
            Query::Answered(answer) if answer.name.as_deref() == Some("host-10.0.0.1")
        ));
    }

    #[test]
    fn test_trace_config_zero_queries() {
        let config = TraceConfig {
            queries: Queries(0),
            ..Default::default()
        };
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, Error::BadConfig(msg) if msg == "queries may not be zero"));
        assert!(Tracer::new(&config, |_| {}, |_| None).is_err());
    }

    #[test]
    fn test_trace_config_zero_max_ttl() {
        let config = TraceConfig {
            max_ttl: TimeToLive(0),
            ..Default::default()
        };
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, Error::BadConfig(msg) if msg == "max_ttl may not be zero"));
    }
}
