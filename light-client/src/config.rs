use serde::{Deserialize, Serialize};

/// Seconds a fixture waits for the next realtime frame before returning to its
/// own programme. 255 keeps it in realtime mode indefinitely.
pub const DEFAULT_TIMEOUT: u8 = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightsConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_timeout")]
    pub timeout: u8,
}

fn default_timeout() -> u8 {
    DEFAULT_TIMEOUT
}

impl LightsConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
