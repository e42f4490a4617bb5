use crate::resolver::{DnsEntry, Error, ResolvedIpAddrs, Resolver, Result};
use std::net::IpAddr;

/// A blocking DNS resolver backed by the operating system resolver.
///
/// Forward lookups are performed with `getaddrinfo` and reverse lookups
/// with `getnameinfo`.
#[derive(Debug, Copy, Clone, Default)]
pub struct SystemResolver;

impl SystemResolver {
    /// Create a `SystemResolver`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Resolver for SystemResolver {
    fn lookup(&self, hostname: impl AsRef<str>) -> Result<ResolvedIpAddrs> {
        let addrs = dns_lookup::lookup_host(hostname.as_ref())
            .map_err(|err| Error::LookupFailed(Box::new(err)))?
            .into_iter()
            .filter_map(|addr| match addr {
                IpAddr::V4(addr) => Some(addr),
                IpAddr::V6(_) => None,
            })
            .collect();
        Ok(ResolvedIpAddrs(addrs))
    }

    fn reverse_lookup(&self, addr: impl Into<IpAddr>) -> DnsEntry {
        let addr = addr.into();
        // A reverse lookup which finds no name echoes back the address and
        // so we treat both failures and echoes as not found.
        match dns_lookup::lookup_addr(&addr) {
            Ok(name) if name != addr.to_string() => DnsEntry::Resolved(addr, name),
            Ok(_) | Err(_) => DnsEntry::NotFound(addr),
        }
    }
}
