//! Packet wire format parsing and building.
//!
//! The following packet are supported:
//! - `ICMPv4`
//! - `IPv4`
//!
//! # Endianness
//!
//! The internal representation is held in network byte order (big-endian) and
//! all accessor methods take and return data in host byte order, converting as
//! necessary for the given architecture.
//!
//! # Example
//!
//! The following example builds an `ICMPv4` echo request packet:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use hoplite_packet::checksum::icmp_ipv4_checksum;
//! use hoplite_packet::icmpv4::echo_request::EchoRequestPacket;
//! use hoplite_packet::icmpv4::{IcmpCode, IcmpPacket, IcmpType};
//!
//! let mut buf = [0; IcmpPacket::minimum_packet_size()];
//! let mut icmp = EchoRequestPacket::new(&mut buf)?;
//! icmp.set_icmp_type(IcmpType::EchoRequest);
//! icmp.set_icmp_code(IcmpCode(0));
//! icmp.set_identifier(1234);
//! icmp.set_sequence(10);
//! icmp.set_checksum(icmp_ipv4_checksum(icmp.packet()));
//! assert_eq!(icmp.packet(), &hex_literal::hex!("08 00 f3 23 04 d2 00 0a"));
//! # Ok(())
//! # }
//! ```
//!
//! The following example parses an `ICMPv4` echo reply packet and asserts its
//! fields:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use hoplite_packet::icmpv4::echo_reply::EchoReplyPacket;
//! use hoplite_packet::icmpv4::{IcmpCode, IcmpType};
//!
//! let buf = hex_literal::hex!("00 00 fb 23 04 d2 00 0a");
//! let packet = EchoReplyPacket::new_view(&buf)?;
//! assert_eq!(IcmpType::EchoReply, packet.get_icmp_type());
//! assert_eq!(IcmpCode(0), packet.get_icmp_code());
//! assert_eq!(0xfb23, packet.get_checksum());
//! assert_eq!(1234, packet.get_identifier());
//! assert_eq!(10, packet.get_sequence());
//! assert!(packet.payload().is_empty());
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod buffer;

/// Packet errors.
pub mod error;

/// Functions for calculating network checksums.
pub mod checksum;

/// `ICMPv4` packets.
pub mod icmpv4;

/// `IPv4` packets.
pub mod ipv4;

/// The IP packet next layer protocol.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IpProtocol {
    Icmp,
    Udp,
    Other(u8),
}

impl IpProtocol {
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Icmp => 1,
            Self::Udp => 17,
            Self::Other(id) => id,
        }
    }
}

impl From<u8> for IpProtocol {
    fn from(id: u8) -> Self {
        match id {
            1 => Self::Icmp,
            17 => Self::Udp,
            p => Self::Other(p),
        }
    }
}

/// Format a payload as a hexadecimal string.
#[must_use]
pub fn fmt_payload(bytes: &[u8]) -> String {
    use itertools::Itertools as _;
    format!("{:02x}", bytes.iter().format(" "))
}
