use lightfx::Color;
use log::info;
use serde_json::Value;

use crate::animations::AnimationContext;
use crate::config::LightConfig;
use crate::factory::{AnimationFactory, AnimationFactoryError};
use crate::runner::{AnimationRunner, OnComplete, SharedLightClient};

/// One fixture: its frame runner plus the geometry animations are built for.
pub struct Light {
    name: String,
    context: AnimationContext,
    runner: AnimationRunner,
}

impl Light {
    pub fn new(name: &str, config: &LightConfig, client: SharedLightClient) -> Self {
        Self {
            name: name.to_owned(),
            context: AnimationContext {
                light_count: config.num_leds,
                fps: config.animation_fps,
            },
            runner: AnimationRunner::new(client, config.num_leds, config.animation_fps),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> AnimationContext {
        self.context
    }

    pub fn is_animating(&self) -> bool {
        self.runner.is_running()
    }

    pub async fn on(&mut self) {
        info!("Turning on light {}", self.name);
        self.runner.show(|frame| frame.fill(Color::white())).await;
    }

    pub async fn off(&mut self) {
        info!("Turning off light {}", self.name);
        self.runner.show(|frame| frame.clear()).await;
    }

    /// Builds the animation first so that a bad name or configuration leaves
    /// whatever is currently running untouched.
    pub async fn start_animation(
        &mut self,
        factory: &AnimationFactory,
        name: &str,
        config: &Value,
        on_complete: Option<OnComplete>,
    ) -> Result<(), AnimationFactoryError> {
        let animation = factory.make(name, config, &self.context)?;
        info!(
            "Starting animation {} on light {}",
            animation.animation_name(),
            self.name
        );
        self.runner.start(animation, on_complete).await;
        Ok(())
    }

    pub async fn stop_animation(&mut self) {
        self.runner.stop().await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use lightfx::Frame;
    use maestro_light_client::{LightsConfig, MockLightClient, DEFAULT_TIMEOUT};
    use serde_json::json;

    use super::*;

    fn light(client: Arc<MockLightClient>) -> Light {
        let config = LightConfig {
            endpoint: LightsConfig {
                host: "127.0.0.1".into(),
                port: 21324,
                timeout: DEFAULT_TIMEOUT,
            },
            num_leds: 6,
            animation_fps: 100.0,
        };
        Light::new("desk", &config, client)
    }

    #[tokio::test]
    async fn on_and_off_send_a_single_frame() {
        let client = Arc::new(MockLightClient::new());
        let mut light = light(client.clone());

        light.on().await;
        light.off().await;

        assert_eq!(
            *client.get_frames(),
            vec![Frame::new(6, Color::white()), Frame::new_black(6)]
        );
    }

    #[tokio::test]
    async fn turning_off_stops_animation() {
        let client = Arc::new(MockLightClient::new());
        let mut light = light(client.clone());
        let factory = AnimationFactory::new();

        light
            .start_animation(&factory, "fire", &json!({}), None)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(light.is_animating());

        light.off().await;
        assert!(!light.is_animating());
        let sent = client.frame_count();
        assert_eq!(client.get_frames().last(), Some(&Frame::new_black(6)));

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(client.frame_count(), sent);
    }

    #[tokio::test]
    async fn rejected_start_keeps_running_animation() {
        let client = Arc::new(MockLightClient::new());
        let mut light = light(client.clone());
        let factory = AnimationFactory::new();

        light
            .start_animation(&factory, "Sparkle", &json!({ "colour": [255, 0, 0] }), None)
            .await
            .unwrap();

        let unknown = light
            .start_animation(&factory, "Rainbow", &json!({}), None)
            .await;
        assert_eq!(
            unknown,
            Err(AnimationFactoryError::UnknownAnimation("Rainbow".into()))
        );

        let invalid = light
            .start_animation(&factory, "Fire", &json!({ "cooling": 0 }), None)
            .await;
        assert!(matches!(invalid, Err(AnimationFactoryError::InvalidConfig(_))));

        assert!(light.is_animating());
        light.stop_animation().await;
        assert!(!light.is_animating());

        let red = Color::rgb(255, 0, 0);
        let last = client.get_frames().last().cloned().unwrap();
        assert_eq!(last.pixels_iter().filter(|c| **c == red).count(), 1);
    }

    #[tokio::test]
    async fn completion_reports_canonical_name() {
        let client = Arc::new(MockLightClient::new());
        let mut light = light(client);
        let factory = AnimationFactory::new();
        let (sender, receiver) = tokio::sync::oneshot::channel();

        light
            .start_animation(
                &factory,
                "fadesequence",
                &json!({ "sequence": [5], "speed": 255 }),
                Some(Box::new(move |name| {
                    let _ = sender.send(name.to_owned());
                })),
            )
            .await
            .unwrap();

        assert_eq!(receiver.await.unwrap(), "FadeSequence");
        assert_eq!(light.context().max_index(), 5);
    }
}
