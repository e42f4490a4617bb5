use std::fmt::{Display, Formatter};
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// A DNS resolver.
pub trait Resolver {
    /// Perform a blocking DNS hostname lookup and return the resolved IPv4 addresses.
    fn lookup(&self, hostname: impl AsRef<str>) -> Result<ResolvedIpAddrs>;

    /// Perform a blocking reverse DNS lookup of `IpAddr` and return a `DnsEntry`.
    ///
    /// Reverse lookups cannot fail, an address which does not resolve is
    /// returned as `DnsEntry::NotFound`.
    #[must_use]
    fn reverse_lookup(&self, addr: impl Into<IpAddr>) -> DnsEntry;
}

/// A DNS resolver error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A DNS resolver error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("DNS lookup failed")]
    LookupFailed(Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// The output of a successful DNS lookup.
#[derive(Debug, Clone)]
pub struct ResolvedIpAddrs(pub(super) Vec<Ipv4Addr>);

impl ResolvedIpAddrs {
    pub fn iter(&self) -> impl Iterator<Item = &'_ Ipv4Addr> {
        self.0.iter()
    }
}

impl IntoIterator for ResolvedIpAddrs {
    type Item = Ipv4Addr;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The outcome of a reverse DNS lookup.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DnsEntry {
    /// The `IpAddr` resolved to a hostname.
    Resolved(IpAddr, String),
    /// The `IpAddr` could not be resolved.
    NotFound(IpAddr),
}

impl DnsEntry {
    /// The resolved hostname, if any.
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        match self {
            Self::Resolved(_, name) => Some(name.as_str()),
            Self::NotFound(_) => None,
        }
    }
}

impl Display for DnsEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolved(_, name) => write!(f, "{name}"),
            Self::NotFound(ip) => write!(f, "{ip}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_resolved_entry() {
        let entry = DnsEntry::Resolved(
            IpAddr::from_str("1.1.1.1").unwrap(),
            "one.one.one.one".to_string(),
        );
        assert_eq!(entry.hostname(), Some("one.one.one.one"));
        assert_eq!(entry.to_string(), "one.one.one.one");
    }

    #[test]
    fn test_not_found_entry() {
        let entry = DnsEntry::NotFound(IpAddr::from_str("1.1.1.1").unwrap());
        assert_eq!(entry.hostname(), None);
        assert_eq!(entry.to_string(), "1.1.1.1");
    }

    #[test]
    fn test_resolved_ip_addrs_iter() {
        let addrs = ResolvedIpAddrs(vec![Ipv4Addr::new(1, 1, 1, 1), Ipv4Addr::new(1, 0, 0, 1)]);
        let mut iter = addrs.into_iter();
        assert_eq!(iter.next(), Some(Ipv4Addr::new(1, 1, 1, 1)));
        assert_eq!(iter.next(), Some(Ipv4Addr::new(1, 0, 0, 1)));
        assert_eq!(iter.next(), None);
    }
}
