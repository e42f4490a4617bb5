use crate::types::{PayloadPattern, PayloadSize, Port, ProbeCount, ProbeId, Queries, TimeToLive};
use rand::Rng;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default values for configuration.
pub mod defaults {
    use std::time::Duration;

    /// The default value for `probe-timeout`.
    pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

    /// The default value for `probe-interval`.
    pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(1);

    /// The default value for `payload-size`.
    pub const DEFAULT_PAYLOAD_SIZE: u16 = 56;

    /// The default value for `payload-pattern`.
    pub const DEFAULT_PAYLOAD_PATTERN: u8 = 0;

    /// The default value for `max-ttl`.
    pub const DEFAULT_MAX_TTL: u8 = 30;

    /// The default value for `queries`.
    pub const DEFAULT_QUERIES: u8 = 3;

    /// The default value for `query-timeout`.
    pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

    /// The default value for `port`.
    pub const DEFAULT_TRACE_PORT: u16 = 33434;
}

/// Generate a random session identifier.
///
/// Zero is never returned so the identifier always differs from the zeroed
/// identifier of unrelated echo traffic.
#[must_use]
pub fn random_probe_id() -> ProbeId {
    ProbeId(rand::thread_rng().gen_range(1..=u16::MAX))
}

/// Ping session configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PingConfig {
    /// The target address.
    pub target_addr: Ipv4Addr,
    /// The session identifier carried by every echo request.
    pub identifier: ProbeId,
    /// The number of probes to send, or `None` to probe until interrupted.
    pub count: Option<ProbeCount>,
    /// The interval to sleep between probes.
    pub interval: Duration,
    /// The timeout for each probe.
    pub probe_timeout: Duration,
    /// The wall clock limit for the whole session, or `None` for no limit.
    pub deadline: Option<Duration>,
    /// The size of the echo request payload.
    pub payload_size: PayloadSize,
    /// The payload fill byte.
    pub payload_pattern: PayloadPattern,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            target_addr: Ipv4Addr::UNSPECIFIED,
            identifier: random_probe_id(),
            count: None,
            interval: defaults::DEFAULT_PROBE_INTERVAL,
            probe_timeout: defaults::DEFAULT_PROBE_TIMEOUT,
            deadline: None,
            payload_size: PayloadSize(defaults::DEFAULT_PAYLOAD_SIZE),
            payload_pattern: PayloadPattern(defaults::DEFAULT_PAYLOAD_PATTERN),
        }
    }
}

/// Traceroute configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TraceConfig {
    /// The target address.
    pub target_addr: Ipv4Addr,
    /// The maximum time to live to probe.
    pub max_ttl: TimeToLive,
    /// The number of queries to send per hop.
    pub queries: Queries,
    /// The timeout for each query.
    pub query_timeout: Duration,
    /// The UDP destination port for probes.
    pub port: Port,
    /// Whether to skip reverse name resolution of responders.
    pub numeric: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            target_addr: Ipv4Addr::UNSPECIFIED,
            max_ttl: TimeToLive(defaults::DEFAULT_MAX_TTL),
            queries: Queries(defaults::DEFAULT_QUERIES),
            query_timeout: defaults::DEFAULT_QUERY_TIMEOUT,
            port: Port(defaults::DEFAULT_TRACE_PORT),
            numeric: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_config_defaults() {
        let config = PingConfig::default();
        assert_eq!(config.target_addr, Ipv4Addr::UNSPECIFIED);
        assert_ne!(config.identifier, ProbeId(0));
        assert_eq!(config.count, None);
        assert_eq!(config.interval, Duration::from_secs(1));
        assert_eq!(config.probe_timeout, Duration::from_secs(1));
        assert_eq!(config.deadline, None);
        assert_eq!(config.payload_size, PayloadSize(56));
        assert_eq!(config.payload_pattern, PayloadPattern(0));
    }

    #[test]
    fn test_trace_config_defaults() {
        let config = TraceConfig::default();
        assert_eq!(config.target_addr, Ipv4Addr::UNSPECIFIED);
        assert_eq!(config.max_ttl, TimeToLive(30));
        assert_eq!(config.queries, Queries(3));
        assert_eq!(config.query_timeout, Duration::from_secs(2));
        assert_eq!(config.port, Port(33434));
        assert!(!config.numeric);
    }

    #[test]
    fn test_random_probe_id_is_never_zero() {
        for _ in 0..1000 {
            assert_ne!(random_probe_id(), ProbeId(0));
        }
    }
}
