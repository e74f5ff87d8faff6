/// UPnP discovery responder
///
/// Owns the SSDP socket for its lifetime and answers matching search
/// requests with a unicast response pointing at the description
/// document. One datagram is handled at a time; handling is pure
/// computation, so the receive loop never blocks on anything but the
/// socket itself.
use anyhow::Result;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use hueshim_core::ResolvedConfig;

use super::ssdp::{build_search_response, match_request, parse_request};

/// Port reserved for SSDP by the UPnP specification.
const SSDP_PORT: u16 = 1900;

/// SSDP multicast group.
const SSDP_MULTICAST_ADDR: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);

/// Discovery responder for the emulated bridge.
pub struct SsdpResponder {
    config: Arc<ResolvedConfig>,
    listen_task: Option<JoinHandle<()>>,
}

impl SsdpResponder {
    /// Create a responder. The socket is not bound until [`start`].
    ///
    /// [`start`]: SsdpResponder::start
    pub fn new(config: Arc<ResolvedConfig>) -> Self {
        Self {
            config,
            listen_task: None,
        }
    }

    /// Decide how to answer one datagram.
    ///
    /// Parse, match, build: `Some((payload, destination))` when the
    /// request is one of the answered search idioms, `None` otherwise.
    /// The destination is always the sender's address. No I/O happens
    /// here.
    pub fn handle_datagram(&self, data: &[u8], from: SocketAddr) -> Option<(Vec<u8>, SocketAddr)> {
        answer_search(&self.config, data, from)
    }

    /// Bind the SSDP socket and start answering search requests.
    pub fn start(&mut self) -> Result<()> {
        if self.listen_task.is_some() {
            warn!("SSDP responder already running");
            return Ok(());
        }

        let socket = create_ssdp_socket(&self.config)?;
        info!("SSDP responder listening on port {}", SSDP_PORT);

        let config = self.config.clone();
        self.listen_task = Some(tokio::spawn(async move {
            receive_loop(socket, config).await;
        }));

        Ok(())
    }

    /// Stop the responder and release the socket.
    pub fn stop(&mut self) {
        if let Some(task) = self.listen_task.take() {
            info!("Stopping SSDP responder");
            task.abort();
        }
    }
}

impl Drop for SsdpResponder {
    fn drop(&mut self) {
        if let Some(task) = self.listen_task.take() {
            task.abort();
        }
    }
}

/// Parse -> match -> build pipeline shared by the receive loop and
/// [`SsdpResponder::handle_datagram`].
fn answer_search(
    config: &ResolvedConfig,
    data: &[u8],
    from: SocketAddr,
) -> Option<(Vec<u8>, SocketAddr)> {
    let request = parse_request(data)?;
    let class = match_request(&request)?;
    debug!("Answering {:?} search from {}", class, from);
    let payload = build_search_response(config.advertise_ip, config.advertise_port, class);
    Some((payload, from))
}

/// Receive datagrams until the task is aborted.
///
/// Nothing in here is allowed to propagate an error: malformed or
/// non-matching datagrams are dropped silently, send failures are
/// logged and forgotten.
async fn receive_loop(socket: UdpSocket, config: Arc<ResolvedConfig>) {
    let mut buf = [0u8; 2048];

    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, from)) => {
                trace!("Received {} byte datagram from {}", len, from);
                if let Some((payload, dest)) = answer_search(&config, &buf[..len], from) {
                    // Best effort: unreachable requesters are not retried
                    if let Err(e) = socket.send_to(&payload, dest).await {
                        warn!("Failed to send search response to {}: {}", dest, e);
                    }
                }
            }
            Err(e) => {
                warn!("SSDP receive error: {}", e);
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }
}

/// Create the SSDP listener socket.
///
/// SO_REUSEADDR (and SO_REUSEPORT on unix) so the bridge can share
/// port 1900 with other UPnP software on the host, then join the
/// multicast group on the configured interface.
fn create_ssdp_socket(config: &ResolvedConfig) -> Result<UdpSocket> {
    let socket = socket2::Socket::new(
        socket2::Domain::IPV4,
        socket2::Type::DGRAM,
        Some(socket2::Protocol::UDP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;

    let interface = match config.host_ip {
        IpAddr::V4(ip) => ip,
        IpAddr::V6(_) => Ipv4Addr::UNSPECIFIED,
    };
    let bind_ip = if config.upnp_bind_multicast {
        Ipv4Addr::UNSPECIFIED
    } else {
        interface
    };

    let addr = SocketAddr::from((bind_ip, SSDP_PORT));
    socket.bind(&addr.into())?;

    let socket: std::net::UdpSocket = socket.into();
    socket.join_multicast_v4(&SSDP_MULTICAST_ADDR, &interface)?;
    socket.set_nonblocking(true)?;

    Ok(UdpSocket::from_std(socket)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_responder() -> SsdpResponder {
        SsdpResponder::new(Arc::new(ResolvedConfig {
            listen_port: 8080,
            host_ip: "192.0.2.42".parse().unwrap(),
            advertise_ip: "192.0.2.42".parse().unwrap(),
            advertise_port: 8080,
            upnp_bind_multicast: true,
        }))
    }

    fn sender() -> SocketAddr {
        "203.0.113.9:50000".parse().unwrap()
    }

    #[test]
    fn test_discovery_basic() {
        let responder = test_responder();

        // Request as emitted by the Hue app
        let request = b"M-SEARCH * HTTP/1.1\r\n\
                        HOST:239.255.255.250:1900\r\n\
                        ST:ssdp:all\r\n\
                        Man:\"ssdp:discover\"\r\n\
                        MX:3\r\n\
                        \r\n";

        let (payload, dest) = responder.handle_datagram(request, sender()).unwrap();

        let expected = "HTTP/1.1 200 OK\r\n\
                        CACHE-CONTROL: max-age=60\r\n\
                        EXT:\r\n\
                        LOCATION: http://192.0.2.42:8080/description.xml\r\n\
                        SERVER: FreeRTOS/6.0.5, UPnP/1.0, IpBridge/1.16.0\r\n\
                        hue-bridgeid: 001788FFFE23BFC2\r\n\
                        ST: urn:schemas-upnp-org:device:basic:1\r\n\
                        USN: uuid:2f402f80-da50-11e1-9b23-001788255acc\r\n\
                        \r\n";
        assert_eq!(payload, expected.as_bytes());
        assert_eq!(dest, sender());
    }

    #[test]
    fn test_discovery_rootdevice() {
        let responder = test_responder();

        // Request as emitted by a Busch-Jaeger free@home SysAP
        let request = b"M-SEARCH * HTTP/1.1\r\n\
                        HOST: 239.255.255.250:1900\r\n\
                        MAN: \"ssdp:discover\"\r\n\
                        MX: 40\r\n\
                        ST: upnp:rootdevice\r\n\
                        \r\n";

        let (payload, dest) = responder.handle_datagram(request, sender()).unwrap();

        let expected = "HTTP/1.1 200 OK\r\n\
                        CACHE-CONTROL: max-age=60\r\n\
                        EXT:\r\n\
                        LOCATION: http://192.0.2.42:8080/description.xml\r\n\
                        SERVER: FreeRTOS/6.0.5, UPnP/1.0, IpBridge/1.16.0\r\n\
                        hue-bridgeid: 001788FFFE23BFC2\r\n\
                        ST: upnp:rootdevice\r\n\
                        USN: uuid:2f402f80-da50-11e1-9b23-001788255acc::upnp:rootdevice\r\n\
                        \r\n";
        assert_eq!(payload, expected.as_bytes());
        assert_eq!(dest, sender());
    }

    #[test]
    fn test_no_response_for_other_methods() {
        let responder = test_responder();

        let request = b"INVALID * HTTP/1.1\r\n\
                        HOST:239.255.255.250:1900\r\n\
                        ST:ssdp:all\r\n\
                        Man:\"ssdp:discover\"\r\n\
                        MX:3\r\n\
                        \r\n";

        assert_eq!(responder.handle_datagram(request, sender()), None);
    }

    #[test]
    fn test_no_response_for_other_search_targets() {
        let responder = test_responder();

        let request = b"M-SEARCH * HTTP/1.1\r\n\
                        HOST:239.255.255.250:1900\r\n\
                        ST:urn:dial-multiscreen-org:service:dial:1\r\n\
                        \r\n";

        assert_eq!(responder.handle_datagram(request, sender()), None);
    }

    #[test]
    fn test_no_response_for_garbage() {
        let responder = test_responder();

        assert_eq!(responder.handle_datagram(&[], sender()), None);
        assert_eq!(responder.handle_datagram(&[0xde, 0xad, 0xbe, 0xef], sender()), None);
    }
}
