/// Type definitions for the Hue API
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use hueshim_core::{
    ResolvedConfig, API_USERNAME, BRIDGE_API_VERSION, BRIDGE_FRIENDLY_NAME, BRIDGE_MAC,
    BRIDGE_MODEL_ID, BRIDGE_SERIAL_NUMBER, BRIDGE_SW_VERSION,
};

/// Request body for POST /api
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUsernameRequest {
    pub devicetype: Option<String>,
}

/// One element of the POST /api success payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameResponse {
    pub success: UsernameSuccess,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameSuccess {
    pub username: String,
}

impl UsernameResponse {
    pub fn new() -> Self {
        Self {
            success: UsernameSuccess {
                username: API_USERNAME.to_string(),
            },
        }
    }
}

impl Default for UsernameResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Hue wire-format error envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HueError {
    pub error: HueErrorBody,
}

/// The address/description/type triple clients pattern-match on.
///
/// `type` is serialized as the string "1" because that is what the
/// real bridge firmware of this vintage put on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HueErrorBody {
    pub address: String,
    pub description: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

impl HueError {
    /// Hue error code 1: unauthorized user, for `address`.
    pub fn unauthorized(address: &str) -> Self {
        Self {
            error: HueErrorBody {
                address: address.to_string(),
                description: "unauthorized user".to_string(),
                error_type: "1".to_string(),
            },
        }
    }
}

/// Plain JSON message used for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

/// Short bridge config served by the config views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfigView {
    pub name: String,
    pub mac: String,
    pub bridgeid: String,
    pub modelid: String,
    pub swversion: String,
    pub apiversion: String,
    pub linkbutton: bool,
    pub ipaddress: String,
    pub whitelist: HashMap<String, WhitelistEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhitelistEntry {
    pub name: String,
}

impl BridgeConfigView {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut whitelist = HashMap::new();
        whitelist.insert(
            API_USERNAME.to_string(),
            WhitelistEntry {
                name: BRIDGE_FRIENDLY_NAME.to_string(),
            },
        );

        Self {
            name: BRIDGE_FRIENDLY_NAME.to_string(),
            mac: BRIDGE_MAC.to_string(),
            bridgeid: BRIDGE_SERIAL_NUMBER.to_string(),
            modelid: BRIDGE_MODEL_ID.to_string(),
            swversion: BRIDGE_SW_VERSION.to_string(),
            apiversion: BRIDGE_API_VERSION.to_string(),
            linkbutton: true,
            ipaddress: format!("{}:{}", config.advertise_ip, config.advertise_port),
            whitelist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_error_shape() {
        let error = HueError::unauthorized("/unknown");
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(json["error"]["address"], "/unknown");
        assert_eq!(json["error"]["description"], "unauthorized user");
        assert_eq!(json["error"]["type"], "1");
        assert_eq!(json["error"].as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_username_response_shape() {
        let json = serde_json::to_value(UsernameResponse::new()).unwrap();
        assert_eq!(json["success"]["username"], API_USERNAME);
    }
}
