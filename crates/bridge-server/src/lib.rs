pub mod hue_api;
pub mod upnp;

pub use hue_api::*;
pub use upnp::*;
