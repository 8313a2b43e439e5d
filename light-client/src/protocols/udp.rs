use crate::LightClientError;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::TryFutureExt;
use log::{debug, info};
use std::sync::Arc;
use tokio::{net::UdpSocket, sync::Mutex};

use super::ProtocolLightClient;

#[derive(Clone)]
pub struct UdpLightClient {
    url: String,
    socket: Arc<Mutex<Option<UdpSocket>>>,
}

impl UdpLightClient {
    pub fn new(url: &str) -> Self {
        let url = url.strip_prefix("udp://").unwrap_or(url);
        Self {
            url: url.to_owned(),
            socket: Arc::new(Mutex::new(None)),
        }
    }

    async fn connect(&self) -> Result<UdpSocket, LightClientError> {
        debug!("Connecting to remote lights at {} via UDP", self.url);
        let connect = UdpSocket::bind("0.0.0.0:0").and_then(|s| async {
            s.connect(&self.url).await?;
            // high throughput and low delay along with high precedence
            s.set_tos(152)?;
            Ok(s)
        });

        match connect.await {
            Ok(socket) => {
                info!("Successfully connected to UDP lights at {}", self.url);
                Ok(socket)
            }
            Err(e) => Err(LightClientError::ConnectionLost {
                reason: e.to_string(),
            }),
        }
    }
}

#[async_trait]
impl ProtocolLightClient for UdpLightClient {
    async fn send_packet(&self, packet: Bytes) -> Result<(), LightClientError> {
        let mut socket = self.socket.lock().await;

        let connected = match socket.take() {
            Some(connected) => connected,
            None => self.connect().await?,
        };

        match connected.send(&packet).await {
            Ok(_) => {
                *socket = Some(connected);
                Ok(())
            }
            Err(e) => Err(LightClientError::ConnectionLost {
                reason: e.to_string(),
            }),
        }
    }
}
