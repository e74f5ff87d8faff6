/// UPnP discovery layer of the emulated bridge
///
/// This module provides:
/// - SSDP search request parsing, matching and response formatting
/// - The discovery responder owning the SSDP socket
/// - Device description XML generation
pub mod description;
pub mod responder;
pub mod ssdp;

pub use description::generate_description_xml;
pub use responder::SsdpResponder;
pub use ssdp::{build_search_response, match_request, parse_request, DiscoveryRequest, SearchClass};
