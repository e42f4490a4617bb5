use crate::config::{PingConfig, TraceConfig};
use crate::error::{Error, Result};
use crate::net::socket::Socket;
use crate::net::{ipv4, PingNetwork, TraceNetwork};
use crate::probe::{EchoProbe, EchoResponse, HopReply};
use crate::types::{PayloadPattern, PayloadSize, Port, TimeToLive};
use hoplite_packet::icmpv4::IcmpPacket;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::net::Ipv4Addr;
use std::time::{Duration, SystemTime};
use tracing::instrument;

/// The maximum size of the IP packet we allow.
pub const MAX_PACKET_SIZE: usize = 1024;

/// A channel for sending ICMP echo requests and receiving echo replies.
pub struct PingChannel<S: Socket> {
    socket: S,
    dest_addr: Ipv4Addr,
    payload_size: PayloadSize,
    payload_pattern: PayloadPattern,
}

// Manual impl as the socket type is not required to be `Debug`.
impl<S: Socket> Debug for PingChannel<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PingChannel")
            .field("dest_addr", &self.dest_addr)
            .field("payload_size", &self.payload_size)
            .field("payload_pattern", &self.payload_pattern)
            .finish_non_exhaustive()
    }
}

impl<S: Socket> PingChannel<S> {
    /// Create a `PingChannel`.
    ///
    /// This operation requires the `CAP_NET_RAW` capability on Linux.
    #[instrument(skip_all, level = "trace")]
    pub fn connect(config: &PingConfig) -> Result<Self> {
        tracing::debug!(?config);
        if usize::from(config.payload_size.0) > ipv4::MAX_ICMP_PAYLOAD_BUF {
            return Err(Error::InvalidPacketSize(
                IcmpPacket::minimum_packet_size() + usize::from(config.payload_size.0),
            ));
        }
        let socket = S::new_icmp_ipv4().map_err(Error::SocketCreation)?;
        Ok(Self {
            socket,
            dest_addr: config.target_addr,
            payload_size: config.payload_size,
            payload_pattern: config.payload_pattern,
        })
    }
}

impl<S: Socket> PingNetwork for PingChannel<S> {
    #[instrument(skip(self), level = "trace")]
    fn send_probe(&mut self, probe: EchoProbe) -> Result<()> {
        tracing::debug!(?probe);
        ipv4::dispatch_echo_probe(
            &mut self.socket,
            probe,
            self.dest_addr,
            self.payload_size,
            self.payload_pattern,
        )
    }

    #[instrument(skip_all, level = "trace")]
    fn recv_reply(&mut self, timeout: Duration) -> Result<Option<EchoResponse>> {
        let resp = if self.socket.is_readable(timeout)? {
            ipv4::recv_echo_response(&mut self.socket)?
        } else {
            None
        };
        if let Some(resp) = &resp {
            tracing::debug!(?resp);
        }
        Ok(resp)
    }
}

/// A channel for sending UDP probes and receiving ICMP responses.
///
/// A fresh pair of sockets is created for every hop query and dropped once
/// the query completes.
pub struct TraceChannel<S: Socket> {
    dest_addr: Ipv4Addr,
    port: Port,
    query_timeout: Duration,
    phantom: PhantomData<S>,
}

impl<S: Socket> TraceChannel<S> {
    /// Create a `TraceChannel`.
    #[instrument(skip_all, level = "trace")]
    pub fn new(config: &TraceConfig) -> Self {
        tracing::debug!(?config);
        Self {
            dest_addr: config.target_addr,
            port: config.port,
            query_timeout: config.query_timeout,
            phantom: PhantomData,
        }
    }
}

impl<S: Socket> TraceNetwork for TraceChannel<S> {
    #[instrument(skip(self), level = "trace")]
    fn query_hop(&mut self, ttl: TimeToLive) -> Result<Option<HopReply>> {
        // Create the receive socket before sending so the response cannot be
        // missed.  Either socket creation requires `CAP_NET_RAW` on Linux.
        let mut recv_socket = S::new_icmp_ipv4().map_err(Error::SocketCreation)?;
        let mut send_socket = S::new_udp_dgram_ipv4().map_err(Error::SocketCreation)?;
        let sent = SystemTime::now();
        ipv4::dispatch_udp_probe(&mut send_socket, self.dest_addr, self.port, ttl)?;
        let resp = if recv_socket.is_readable(self.query_timeout)? {
            ipv4::recv_hop_response(&mut recv_socket)?
        } else {
            None
        };
        let reply = resp.map(|resp| {
            HopReply::new(
                resp.addr,
                resp.recv.duration_since(sent).unwrap_or_default(),
                resp.kind,
            )
        });
        if let Some(reply) = &reply {
            tracing::debug!(?reply);
        }
        Ok(reply)
    }
}
