mod config;
mod mock;
pub mod protocols;

use async_trait::async_trait;
use lightfx::Frame;
use thiserror::Error;

pub use config::{LightsConfig, DEFAULT_TIMEOUT};
pub use mock::MockLightClient;
pub use protocols::{DrgbAdapter, ProtocolLightClient, UdpLightClient};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LightClientError {
    #[error("connection lost: {reason}")]
    ConnectionLost { reason: String },

    #[error("frame cannot be encoded: {reason}")]
    Encoding { reason: String },
}

/// Sends complete frames to a fixture. Delivery is best effort: an `Ok` only
/// means the frame was handed over to the transport.
#[async_trait]
pub trait LightClient {
    async fn display_frame(&self, frame: &Frame) -> Result<(), LightClientError>;
}

/// Builds the realtime UDP client for a fixture configured with `config`.
pub fn udp_client(config: &LightsConfig) -> DrgbAdapter<UdpLightClient> {
    UdpLightClient::new(&config.address()).with_drgb(config.timeout)
}
