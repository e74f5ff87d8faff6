/// UPnP device description XML for the emulated bridge
///
/// Clients fetch this document from the LOCATION advertised in
/// discovery responses and correlate its serialNumber/UDN with the
/// hue-bridgeid and USN they saw on the wire.
use std::net::IpAddr;

use hueshim_core::{BRIDGE_DEVICE_UUID, BRIDGE_FRIENDLY_NAME, BRIDGE_MODEL_ID, BRIDGE_SERIAL_NUMBER};

/// Generate the root device description document.
pub fn generate_description_xml(advertise_ip: IpAddr, advertise_port: u16) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" ?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
  <specVersion>
    <major>1</major>
    <minor>0</minor>
  </specVersion>
  <URLBase>http://{ip}:{port}/</URLBase>
  <device>
    <deviceType>urn:schemas-upnp-org:device:Basic:1</deviceType>
    <friendlyName>{name} ({ip})</friendlyName>
    <manufacturer>Royal Philips Electronics</manufacturer>
    <manufacturerURL>http://www.philips.com</manufacturerURL>
    <modelDescription>Philips hue Personal Wireless Lighting</modelDescription>
    <modelName>Philips hue bridge 2015</modelName>
    <modelNumber>{model}</modelNumber>
    <modelURL>http://www.meethue.com</modelURL>
    <serialNumber>{serial}</serialNumber>
    <UDN>uuid:{uuid}</UDN>
  </device>
</root>"#,
        ip = advertise_ip,
        port = advertise_port,
        name = BRIDGE_FRIENDLY_NAME,
        model = BRIDGE_MODEL_ID,
        serial = BRIDGE_SERIAL_NUMBER,
        uuid = BRIDGE_DEVICE_UUID,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_description_xml() {
        let xml = generate_description_xml("192.0.2.42".parse().unwrap(), 8080);

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("urn:schemas-upnp-org:device-1-0"));
        assert!(xml.contains("<URLBase>http://192.0.2.42:8080/</URLBase>"));
        assert!(xml.contains("<serialNumber>001788FFFE23BFC2</serialNumber>"));
        assert!(xml.contains("<UDN>uuid:2f402f80-da50-11e1-9b23-001788255acc</UDN>"));
        assert!(xml.contains("urn:schemas-upnp-org:device:Basic:1"));
    }

    #[test]
    fn test_description_matches_discovery_identity() {
        // The identity in the document must be the one discovery
        // responses advertise, or clients refuse to pair.
        let xml = generate_description_xml("192.0.2.42".parse().unwrap(), 8080);
        assert!(xml.contains(BRIDGE_SERIAL_NUMBER));
        assert!(xml.contains(BRIDGE_DEVICE_UUID));
    }
}
