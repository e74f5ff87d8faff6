//! Startup configuration for the emulated bridge.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, UdpSocket};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Default port for the HTTP description/API server.
pub const DEFAULT_LISTEN_PORT: u16 = 8300;

/// Errors surfaced while loading or resolving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("no usable local IP address")]
    NoLocalIp(#[source] std::io::Error),
}

/// Configuration as written in the TOML file.
///
/// Every field has a default, so an empty file (or no file at all) gives
/// a working bridge on the routed local address.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Port the HTTP description/API server listens on.
    pub listen_port: u16,
    /// IP to bind and advertise. Resolved from the routing table when unset.
    pub host_ip: Option<IpAddr>,
    /// Overrides the IP written into discovery responses (NAT setups).
    pub advertise_ip: Option<IpAddr>,
    /// Overrides the port written into discovery responses.
    pub advertise_port: Option<u16>,
    /// Bind the SSDP socket to 0.0.0.0 instead of `host_ip`.
    pub upnp_bind_multicast: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            listen_port: DEFAULT_LISTEN_PORT,
            host_ip: None,
            advertise_ip: None,
            advertise_port: None,
            upnp_bind_multicast: true,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Resolve optional fields into the effective runtime configuration.
    ///
    /// `host_ip` falls back to the routed local address, `advertise_ip`
    /// and `advertise_port` fall back to the host values. The result is
    /// fixed for the lifetime of the process and shared read-only by
    /// both listeners.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let host_ip = match self.host_ip {
            Some(ip) => ip,
            None => {
                let ip = local_ip().map_err(ConfigError::NoLocalIp)?;
                debug!("Resolved local IP {}", ip);
                ip
            }
        };
        Ok(ResolvedConfig {
            listen_port: self.listen_port,
            host_ip,
            advertise_ip: self.advertise_ip.unwrap_or(host_ip),
            advertise_port: self.advertise_port.unwrap_or(self.listen_port),
            upnp_bind_multicast: self.upnp_bind_multicast,
        })
    }
}

/// Fully-resolved runtime configuration.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub listen_port: u16,
    pub host_ip: IpAddr,
    pub advertise_ip: IpAddr,
    pub advertise_port: u16,
    pub upnp_bind_multicast: bool,
}

/// Get the local IP the OS routes external traffic through.
///
/// Connecting a UDP socket does not send packets, it just consults the
/// routing table.
pub fn local_ip() -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect("8.8.8.8:80")?;
    Ok(socket.local_addr()?.ip())
}
