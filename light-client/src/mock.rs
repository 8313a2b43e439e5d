use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use lightfx::Frame;

use crate::{LightClient, LightClientError};

/// Records every frame it is asked to display.
#[derive(Default)]
pub struct MockLightClient {
    frames: Mutex<Vec<Frame>>,
    fail: bool,
}

impl MockLightClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client that records frames but reports every send as failed.
    pub fn failing() -> Self {
        Self {
            frames: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn get_frames(&self) -> MutexGuard<'_, Vec<Frame>> {
        self.frames.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn frame_count(&self) -> usize {
        self.get_frames().len()
    }
}

#[async_trait]
impl LightClient for MockLightClient {
    async fn display_frame(&self, frame: &Frame) -> Result<(), LightClientError> {
        self.get_frames().push(frame.clone());
        if self.fail {
            Err(LightClientError::ConnectionLost {
                reason: "mock failure".into(),
            })
        } else {
            Ok(())
        }
    }
}
