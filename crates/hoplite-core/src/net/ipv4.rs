use crate::error::{Error, Result};
use crate::net::channel::MAX_PACKET_SIZE;
use crate::net::socket::Socket;
use crate::probe::{EchoProbe, EchoResponse, HopResponse, ResponseKind};
use crate::types::{PayloadPattern, PayloadSize, Port, ProbeId, Sequence, TimeToLive};
use hoplite_packet::checksum::icmp_ipv4_checksum;
use hoplite_packet::icmpv4::destination_unreachable::DestinationUnreachablePacket;
use hoplite_packet::icmpv4::echo_reply::EchoReplyPacket;
use hoplite_packet::icmpv4::echo_request::EchoRequestPacket;
use hoplite_packet::icmpv4::time_exceeded::TimeExceededPacket;
use hoplite_packet::icmpv4::{IcmpCode, IcmpPacket, IcmpType};
use hoplite_packet::ipv4::Ipv4Packet;
use hoplite_packet::IpProtocol;
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::SystemTime;
use tracing::instrument;

/// The maximum size of an ICMP packet we allow.
const MAX_ICMP_PACKET_BUF: usize = MAX_PACKET_SIZE - Ipv4Packet::minimum_packet_size();

/// The maximum size of an ICMP payload we allow.
pub const MAX_ICMP_PAYLOAD_BUF: usize = MAX_ICMP_PACKET_BUF - IcmpPacket::minimum_packet_size();

/// Dispatch an ICMP echo request probe.
#[instrument(skip(icmp_send_socket), level = "trace")]
pub fn dispatch_echo_probe<S: Socket>(
    icmp_send_socket: &mut S,
    probe: EchoProbe,
    dest_addr: Ipv4Addr,
    payload_size: PayloadSize,
    payload_pattern: PayloadPattern,
) -> Result<()> {
    let mut icmp_buf = [0_u8; MAX_ICMP_PACKET_BUF];
    let payload_size = usize::from(payload_size.0);
    if payload_size > MAX_ICMP_PAYLOAD_BUF {
        return Err(Error::InvalidPacketSize(
            IcmpPacket::minimum_packet_size() + payload_size,
        ));
    }
    let echo_request = make_echo_request(&mut icmp_buf, probe, payload_size, payload_pattern)?;
    let remote_addr = SocketAddr::new(IpAddr::V4(dest_addr), 0);
    icmp_send_socket.send_to(echo_request.packet(), remote_addr)?;
    Ok(())
}

/// Read the next datagram and extract the ICMP echo reply, if any.
///
/// The kernel prepends the IPv4 header to every datagram delivered by a raw
/// ICMP socket and so the ICMP packet must be extracted from the IPv4
/// payload.  Datagrams which cannot be parsed or are not echo replies are
/// discarded, not failed, as a raw ICMP socket is delivered a copy of every
/// ICMP datagram received by the host.
#[instrument(skip(recv_socket), level = "trace")]
pub fn recv_echo_response<S: Socket>(recv_socket: &mut S) -> Result<Option<EchoResponse>> {
    let mut buf = [0_u8; MAX_PACKET_SIZE];
    match recv_socket.recv_from(&mut buf) {
        Ok((bytes_read, Some(addr))) => Ok(extract_echo_response(&buf[..bytes_read], addr.ip())),
        Ok((_, None)) => Ok(None),
        Err(err) => match err.kind() {
            ErrorKind::WouldBlock => Ok(None),
            _ => Err(Error::Io(err)),
        },
    }
}

/// Dispatch an empty UDP probe with the given time to live.
#[instrument(skip(udp_send_socket), level = "trace")]
pub fn dispatch_udp_probe<S: Socket>(
    udp_send_socket: &mut S,
    dest_addr: Ipv4Addr,
    port: Port,
    ttl: TimeToLive,
) -> Result<()> {
    udp_send_socket.set_ttl(u32::from(ttl.0))?;
    let remote_addr = SocketAddr::new(IpAddr::V4(dest_addr), port.0);
    udp_send_socket.send_to(&[], remote_addr)?;
    Ok(())
}

/// Read the next datagram and extract the ICMP response, if any.
///
/// Unlike `recv_echo_response` the type of the ICMP packet is not used to
/// filter responses, it is recorded so that the caller may distinguish
/// intermediate hops from the destination.
#[instrument(skip(recv_socket), level = "trace")]
pub fn recv_hop_response<S: Socket>(recv_socket: &mut S) -> Result<Option<HopResponse>> {
    let mut buf = [0_u8; MAX_PACKET_SIZE];
    match recv_socket.recv_from(&mut buf) {
        Ok((bytes_read, Some(addr))) => Ok(extract_hop_response(&buf[..bytes_read], addr.ip())),
        Ok((_, None)) => Ok(None),
        Err(err) => match err.kind() {
            ErrorKind::WouldBlock => Ok(None),
            _ => Err(Error::Io(err)),
        },
    }
}

/// Create an ICMP `EchoRequest` packet.
fn make_echo_request<'a>(
    icmp_buf: &'a mut [u8],
    probe: EchoProbe,
    payload_size: usize,
    payload_pattern: PayloadPattern,
) -> Result<EchoRequestPacket<'a>> {
    let payload_buf = [payload_pattern.0; MAX_ICMP_PAYLOAD_BUF];
    let packet_size = IcmpPacket::minimum_packet_size() + payload_size;
    let mut icmp = EchoRequestPacket::new(&mut icmp_buf[..packet_size])?;
    icmp.set_icmp_type(IcmpType::EchoRequest);
    icmp.set_icmp_code(IcmpCode(0));
    icmp.set_identifier(probe.identifier.0);
    icmp.set_payload(&payload_buf[..payload_size]);
    icmp.set_sequence(probe.sequence.0);
    icmp.set_checksum(icmp_ipv4_checksum(icmp.packet()));
    Ok(icmp)
}

/// Extract an `EchoResponse` from an IPv4 datagram.
///
/// The checksum of the received packet is not verified.
#[instrument(skip(datagram), ret, level = "trace")]
fn extract_echo_response(datagram: &[u8], addr: IpAddr) -> Option<EchoResponse> {
    let recv = SystemTime::now();
    let icmp = extract_icmp_packet(datagram)?;
    match icmp.get_icmp_type() {
        IcmpType::EchoReply => {
            let echo_reply = EchoReplyPacket::new_view(icmp.packet()).ok()?;
            Some(EchoResponse::new(
                recv,
                addr,
                ProbeId(echo_reply.get_identifier()),
                Sequence(echo_reply.get_sequence()),
            ))
        }
        _ => None,
    }
}

/// Extract a `HopResponse` from an IPv4 datagram.
#[instrument(skip(datagram), ret, level = "trace")]
fn extract_hop_response(datagram: &[u8], addr: IpAddr) -> Option<HopResponse> {
    let recv = SystemTime::now();
    let icmp = extract_icmp_packet(datagram)?;
    let kind = match icmp.get_icmp_type() {
        IcmpType::TimeExceeded => {
            let time_exceeded = TimeExceededPacket::new_view(icmp.packet()).ok()?;
            tracing::trace!(?time_exceeded);
            ResponseKind::TimeExceeded
        }
        IcmpType::DestinationUnreachable => {
            let dest_unreachable = DestinationUnreachablePacket::new_view(icmp.packet()).ok()?;
            tracing::trace!(?dest_unreachable);
            ResponseKind::DestinationUnreachable
        }
        IcmpType::EchoReply => ResponseKind::EchoReply,
        icmp_type => ResponseKind::Other(icmp_type.id()),
    };
    Some(HopResponse::new(recv, addr, kind))
}

/// View the ICMP packet within an IPv4 datagram.
///
/// Returns `None` for datagrams which are truncated or do not carry ICMP.
fn extract_icmp_packet(datagram: &[u8]) -> Option<IcmpPacket<'_>> {
    let ipv4 = Ipv4Packet::new_view(datagram).ok()?;
    if ipv4.get_protocol() != IpProtocol::Icmp {
        return None;
    }
    // Re-slice from `datagram` so the view borrows the caller's buffer
    // rather than the local `ipv4`; the payload is always a suffix.
    let payload = &datagram[datagram.len() - ipv4.payload().len()..];
    IcmpPacket::new_view(payload).ok()
}
