/// HTTP description/API server of the emulated bridge
///
/// Serves the device description document plus the minimal
/// unauthenticated Hue API endpoints legacy clients hit during the
/// pairing handshake.
pub mod routes;
pub mod server;
pub mod types;

pub use server::ApiServer;
pub use types::*;
