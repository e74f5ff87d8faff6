/// SSDP search request parsing and response formatting
///
/// Discovery requests arrive as HTTP-over-UDP datagrams on the SSDP
/// multicast port. The functions here are pure: parse a datagram,
/// decide whether the bridge answers it, and format the exact response
/// bytes. The responder wires them to the socket.
use std::collections::HashMap;
use std::net::IpAddr;

use hueshim_core::{BRIDGE_DEVICE_UUID, BRIDGE_SERIAL_NUMBER};

/// How long clients may cache a discovery response, in seconds.
const CACHE_MAX_AGE_SECS: u32 = 60;

/// SERVER string of the bridge firmware being mimicked. Client apps
/// pattern-match on this literal text, not on HTTP semantics.
const SERVER_STRING: &str = "FreeRTOS/6.0.5, UPnP/1.0, IpBridge/1.16.0";

/// Device type answered for `ssdp:all` searches.
const BASIC_DEVICE_TARGET: &str = "urn:schemas-upnp-org:device:basic:1";

/// A search request parsed from a datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRequest {
    /// Request method, uppercased.
    pub method: String,
    /// Headers keyed by lowercased name, values with whitespace trimmed.
    pub headers: HashMap<String, String>,
}

impl DiscoveryRequest {
    /// Look up a header by its lowercased name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Parse a raw datagram into a request.
///
/// Returns `None` for anything that is not an HTTP request line
/// followed by `Name: value` headers. Garbage traffic from other
/// devices on the network is expected here and must never take the
/// responder down, so there is no error path at all.
pub fn parse_request(data: &[u8]) -> Option<DiscoveryRequest> {
    let text = std::str::from_utf8(data).ok()?;
    let mut lines = text.lines();

    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?;
    let _path = parts.next()?;
    if !parts.next()?.starts_with("HTTP/") {
        return None;
    }

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        // Lines without a colon are skipped, not fatal
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    Some(DiscoveryRequest {
        method: method.to_ascii_uppercase(),
        headers,
    })
}

/// The two search idioms the bridge answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchClass {
    /// `ssdp:all` searches, answered as a basic device.
    Basic,
    /// `upnp:rootdevice` searches, answered as the root device.
    RootDevice,
}

impl SearchClass {
    /// Search target echoed back in the ST header of the response.
    pub fn search_target(self) -> &'static str {
        match self {
            SearchClass::Basic => BASIC_DEVICE_TARGET,
            SearchClass::RootDevice => "upnp:rootdevice",
        }
    }
}

/// Decide whether a request gets a response.
///
/// Only `M-SEARCH` requests for `ssdp:all` or `upnp:rootdevice` are
/// answered; everything else is silence. The bridge is deliberately
/// selective so it only answers the discovery idioms real client apps
/// send instead of flooding the network.
pub fn match_request(request: &DiscoveryRequest) -> Option<SearchClass> {
    if request.method != "M-SEARCH" {
        return None;
    }
    match request.header("st")?.to_ascii_lowercase().as_str() {
        "ssdp:all" => Some(SearchClass::Basic),
        "upnp:rootdevice" => Some(SearchClass::RootDevice),
        _ => None,
    }
}

/// Format the unicast search response.
///
/// Field order and literal text must byte-match what a real bridge
/// sends. The root device class carries the search target as a USN
/// suffix; the basic class does not.
pub fn build_search_response(advertise_ip: IpAddr, advertise_port: u16, class: SearchClass) -> Vec<u8> {
    let st = class.search_target();
    let usn_suffix = match class {
        SearchClass::Basic => String::new(),
        SearchClass::RootDevice => format!("::{}", st),
    };

    format!(
        "HTTP/1.1 200 OK\r\n\
         CACHE-CONTROL: max-age={}\r\n\
         EXT:\r\n\
         LOCATION: http://{}:{}/description.xml\r\n\
         SERVER: {}\r\n\
         hue-bridgeid: {}\r\n\
         ST: {}\r\n\
         USN: uuid:{}{}\r\n\
         \r\n",
        CACHE_MAX_AGE_SECS,
        advertise_ip,
        advertise_port,
        SERVER_STRING,
        BRIDGE_SERIAL_NUMBER,
        st,
        BRIDGE_DEVICE_UUID,
        usn_suffix
    )
    .into_bytes()
}
