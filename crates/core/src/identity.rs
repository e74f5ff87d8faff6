//! Fixed identity of the emulated bridge.
//!
//! Discovery clients correlate SSDP responses with the description
//! document through these values, so both layers read them from here.

/// Serial number reported by the bridge, also sent as `hue-bridgeid`.
pub const BRIDGE_SERIAL_NUMBER: &str = "001788FFFE23BFC2";

/// UPnP device UUID embedded in discovery USNs and the description UDN.
pub const BRIDGE_DEVICE_UUID: &str = "2f402f80-da50-11e1-9b23-001788255acc";

/// Username handed out to every pairing request.
pub const API_USERNAME: &str = "12345678901234567890";

/// MAC address reported by the config views.
pub const BRIDGE_MAC: &str = "00:00:00:00:00:00";

/// Hardware model of the bridge being mimicked.
pub const BRIDGE_MODEL_ID: &str = "BSB002";

/// Firmware version reported by the config views.
pub const BRIDGE_SW_VERSION: &str = "01003542";

/// Hue API version reported by the config views.
pub const BRIDGE_API_VERSION: &str = "1.17.0";

/// Base friendly name used in the description document and config views.
pub const BRIDGE_FRIENDLY_NAME: &str = "HueShim Bridge";
