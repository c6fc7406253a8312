use serde::{Deserialize, Serialize};

/// Well-known port the embedded content is told to reach the bridge on.
pub const DEFAULT_PORT: u16 = 31120;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Port to bind on the loopback interface. Port 0 asks the OS for an
    /// ephemeral port, which tests rely on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Log each dispatched request with a per-request id.
    #[serde(default = "default_request_log")]
    pub request_log: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            request_log: default_request_log(),
        }
    }
}

/// Base URL handed to the embedded web content as its bridge endpoint root.
///
/// The bridge only ever binds loopback, so the URL is always a 127.0.0.1 one.
pub fn platform_base_url(port: u16) -> String {
    format!("http://127.0.0.1:{port}/ea")
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_request_log() -> bool {
    true
}
