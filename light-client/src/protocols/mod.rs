mod udp;

use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use lightfx::Frame;
use log::info;

use crate::{LightClient, LightClientError};

pub use udp::UdpLightClient;

/// Protocol tag of the WLED "DRGB" realtime format.
pub const DRGB_PROTOCOL: u8 = 2;

/// Largest number of pixels a single DRGB packet can carry.
pub const MAX_DRGB_PIXELS: usize = 490;

/// A transport that moves already encoded packets.
#[async_trait]
pub trait ProtocolLightClient: Sized + Send + Sync {
    async fn send_packet(&self, packet: Bytes) -> Result<(), LightClientError>;

    fn with_drgb(self, timeout: u8) -> DrgbAdapter<Self> {
        info!("Using DRGB realtime protocol with timeout {timeout}");
        DrgbAdapter {
            inner: self,
            timeout,
        }
    }
}

/// Encodes frames as `[protocol, timeout, r, g, b, r, g, b, ...]`.
pub struct DrgbAdapter<T: ProtocolLightClient> {
    inner: T,
    timeout: u8,
}

impl<T: ProtocolLightClient> DrgbAdapter<T> {
    pub fn encode(&self, frame: &Frame) -> Result<Bytes, LightClientError> {
        encode_drgb(frame, self.timeout)
    }
}

#[async_trait]
impl<T> LightClient for DrgbAdapter<T>
where
    T: ProtocolLightClient,
{
    async fn display_frame(&self, frame: &Frame) -> Result<(), LightClientError> {
        let packet = self.encode(frame)?;
        self.inner.send_packet(packet).await
    }
}

pub fn encode_drgb(frame: &Frame, timeout: u8) -> Result<Bytes, LightClientError> {
    if frame.len() > MAX_DRGB_PIXELS {
        return Err(LightClientError::Encoding {
            reason: format!(
                "{} pixels do not fit in a DRGB packet (max {MAX_DRGB_PIXELS})",
                frame.len()
            ),
        });
    }

    let mut packet = BytesMut::with_capacity(2 + 3 * frame.len());
    packet.put_u8(DRGB_PROTOCOL);
    packet.put_u8(timeout);
    for pixel in frame.pixels_iter() {
        packet.put_slice(&pixel.components());
    }
    Ok(packet.freeze())
}
