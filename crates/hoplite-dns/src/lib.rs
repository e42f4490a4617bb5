//! This crate provides a blocking forward and reverse DNS resolver backed
//! by the operating system resolver.
//!
//! # Example
//!
//! The following example resolves a hostname to its IPv4 addresses and then
//! reverse resolves each address back to a hostname:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use hoplite_dns::{Resolver, SystemResolver};
//!
//! let resolver = SystemResolver::new();
//! for addr in resolver.lookup("one.one.one.one")? {
//!     println!("{}", resolver.reverse_lookup(addr));
//! }
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod resolver;
mod system;

pub use resolver::{DnsEntry, Error, ResolvedIpAddrs, Resolver, Result};
pub use system::SystemResolver;
