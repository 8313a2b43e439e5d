use std::sync::Arc;
use std::time::Duration;

use lightfx::Frame;
use log::{debug, error, info, warn};
use maestro_light_client::LightClient;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::animations::Animation;

pub const DEFAULT_FPS: f64 = 30.0;

/// Called with the animation name once an animation completes on its own.
pub type OnComplete = Box<dyn FnOnce(&str) + Send + 'static>;

pub type SharedLightClient = Arc<dyn LightClient + Send + Sync>;

struct RunningAnimation {
    stop_sender: oneshot::Sender<()>,
    join_handle: JoinHandle<Frame>,
}

/// Drives one animation at a time for a single fixture.
///
/// While an animation runs, its task owns the frame and hands it back when it
/// exits, so the frame is never written from two places at once.
pub struct AnimationRunner {
    client: SharedLightClient,
    light_count: usize,
    frame_duration: Duration,
    frame: Option<Frame>,
    running: Option<RunningAnimation>,
}

impl AnimationRunner {
    pub fn new(client: SharedLightClient, light_count: usize, fps: f64) -> Self {
        let frame_duration = Duration::try_from_secs_f64(1.0 / fps).unwrap_or_else(|_| {
            warn!("Invalid frame rate {fps}, falling back to {DEFAULT_FPS}");
            Duration::from_secs_f64(1.0 / DEFAULT_FPS)
        });

        Self {
            client,
            light_count,
            frame_duration,
            frame: Some(Frame::new_black(light_count)),
            running: None,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Whether an animation task is still producing frames.
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.join_handle.is_finished())
    }

    /// Stops whatever is running and starts `animation` on a new task.
    pub async fn start(&mut self, animation: Box<dyn Animation>, on_complete: Option<OnComplete>) {
        self.stop().await;

        let frame = self.take_frame();
        let (stop_sender, stop_receiver) = oneshot::channel();
        let join_handle = tokio::spawn(Self::run(
            animation,
            frame,
            self.client.clone(),
            self.frame_duration,
            stop_receiver,
            on_complete,
        ));

        self.running = Some(RunningAnimation {
            stop_sender,
            join_handle,
        });
    }

    /// Stops the running animation and waits for its task to exit. Does
    /// nothing when no animation runs.
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        // The task may already have exited and dropped its receiver.
        let _ = running.stop_sender.send(());
        let frame = match running.join_handle.await {
            Ok(frame) => frame,
            Err(e) => {
                error!("Animation task failed: {e}");
                Frame::new_black(self.light_count)
            }
        };
        self.frame = Some(frame);
    }

    /// Stops any animation, applies `update` to the frame and sends it once.
    pub async fn show(&mut self, update: impl FnOnce(&mut Frame)) {
        self.stop().await;

        let frame = self
            .frame
            .get_or_insert_with(|| Frame::new_black(self.light_count));
        update(frame);
        if let Err(e) = self.client.display_frame(frame).await {
            warn!("Failed to send frame to lights: {e}");
        }
    }

    /// The last rendered frame, when no animation owns it.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    fn take_frame(&mut self) -> Frame {
        self.frame
            .take()
            .unwrap_or_else(|| Frame::new_black(self.light_count))
    }

    async fn run(
        mut animation: Box<dyn Animation>,
        mut frame: Frame,
        client: SharedLightClient,
        frame_duration: Duration,
        mut stop_receiver: oneshot::Receiver<()>,
        on_complete: Option<OnComplete>,
    ) -> Frame {
        let name = animation.animation_name().to_owned();
        let mut client_healthy = true;
        info!("Animation {name} started");

        loop {
            let deadline = Instant::now() + frame_duration;

            // What the fixture currently shows; a failed frame is discarded.
            let shown = frame.clone();
            let finished = match animation.next_frame(&mut frame) {
                Ok(finished) => finished,
                Err(e) => {
                    error!("Animation {name} failed, stopping it: {e}");
                    return shown;
                }
            };

            match client.display_frame(&frame).await {
                Ok(()) if !client_healthy => {
                    info!("Regained connection to lights");
                    client_healthy = true;
                }
                Ok(()) => {}
                Err(e) if client_healthy => {
                    warn!("Failed to send frame to lights: {e}");
                    client_healthy = false;
                }
                Err(e) => debug!("Failed to send frame to lights: {e}"),
            }

            if finished {
                if stop_receiver.try_recv() == Err(TryRecvError::Empty) {
                    info!("Animation {name} finished");
                    if let Some(on_complete) = on_complete {
                        on_complete(&name);
                    }
                }
                return frame;
            }

            tokio::select! {
                _ = &mut stop_receiver => {
                    info!("Animation {name} stopped");
                    return frame;
                }
                _ = tokio::time::sleep_until(deadline) => {}
            }
        }
    }
}

impl Drop for AnimationRunner {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            let _ = running.stop_sender.send(());
        }
    }
}
