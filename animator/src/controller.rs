use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use maestro_light_client as client;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};

use crate::config::{ControllerConfig, LightConfig, SettingsError};
use crate::factory::{AnimationFactory, AnimationFactoryError};
use crate::light::Light;
use crate::runner::{OnComplete, SharedLightClient};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("unknown light \"{0}\"")]
    UnknownLight(String),

    #[error("animation factory error: {0}")]
    Factory(#[from] AnimationFactoryError),

    #[error(transparent)]
    Config(#[from] SettingsError),
}

/// Published when an animation runs to completion on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationFinished {
    pub light: String,
    /// The animation name exactly as the caller asked for it.
    pub animation: String,
}

pub struct Controller {
    lights: HashMap<String, Mutex<Light>>,
    animation_factory: AnimationFactory,
    finished_sender: mpsc::UnboundedSender<AnimationFinished>,
    finished_receiver: Option<mpsc::UnboundedReceiver<AnimationFinished>>,
}

impl Controller {
    pub fn builder() -> ControllerBuilder {
        ControllerBuilder {
            lights: Vec::new(),
        }
    }

    /// Creates a controller talking DRGB over UDP to every configured light.
    pub fn from_config(config: &ControllerConfig) -> Result<Self, ControllerError> {
        config.validate()?;
        Ok(config
            .lights
            .iter()
            .fold(Self::builder(), |builder, (name, light)| {
                builder.udp_light(name, light)
            })
            .build())
    }

    fn light(&self, name: &str) -> Result<&Mutex<Light>, ControllerError> {
        self.lights
            .get(name)
            .ok_or_else(|| ControllerError::UnknownLight(name.to_owned()))
    }

    /// Names of the configured lights in alphabetical order.
    pub fn lights(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.lights.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn animations(&self) -> Vec<&'static str> {
        self.animation_factory.list()
    }

    /// Hands out the stream of completion events. Only the first call gets it.
    pub fn finished_events(&mut self) -> Option<mpsc::UnboundedReceiver<AnimationFinished>> {
        self.finished_receiver.take()
    }

    pub async fn turn_on(&self, light: &str) -> Result<(), ControllerError> {
        self.light(light)?.lock().await.on().await;
        Ok(())
    }

    pub async fn turn_off(&self, light: &str) -> Result<(), ControllerError> {
        self.light(light)?.lock().await.off().await;
        Ok(())
    }

    pub async fn start_animation(
        &self,
        light: &str,
        animation: &str,
        config: &Value,
    ) -> Result<(), ControllerError> {
        let mut fixture = self.light(light)?.lock().await;

        let sender = self.finished_sender.clone();
        let event = AnimationFinished {
            light: light.to_owned(),
            animation: animation.to_owned(),
        };
        let on_complete: OnComplete = Box::new(move |_: &str| {
            // Nobody may be listening, which is fine.
            let _ = sender.send(event);
        });

        fixture
            .start_animation(&self.animation_factory, animation, config, Some(on_complete))
            .await?;
        Ok(())
    }

    pub async fn stop_animation(&self, light: &str) -> Result<(), ControllerError> {
        self.light(light)?.lock().await.stop_animation().await;
        Ok(())
    }

    pub async fn is_animating(&self, light: &str) -> Result<bool, ControllerError> {
        Ok(self.light(light)?.lock().await.is_animating())
    }

    /// Stops the animations on every light and waits for them to exit.
    pub async fn shutdown(&self) {
        info!("Stopping all animations");
        for light in self.lights.values() {
            light.lock().await.stop_animation().await;
        }
    }
}

pub struct ControllerBuilder {
    lights: Vec<(String, LightConfig, SharedLightClient)>,
}

impl ControllerBuilder {
    pub fn udp_light(self, name: &str, config: &LightConfig) -> Self {
        info!(
            "Using udp light client for light {} with endpoint {}",
            name,
            config.endpoint.address()
        );
        let client = Arc::new(client::udp_client(&config.endpoint));
        self.light(name, config, client)
    }

    pub fn light(mut self, name: &str, config: &LightConfig, client: SharedLightClient) -> Self {
        self.lights.push((name.to_owned(), config.clone(), client));
        self
    }

    pub fn build(self) -> Controller {
        let (finished_sender, finished_receiver) = mpsc::unbounded_channel();
        let animation_factory = AnimationFactory::new();
        info!("Available animations: {}", animation_factory.list().join(", "));

        let lights = self
            .lights
            .into_iter()
            .map(|(name, config, client)| {
                info!("Loaded light {} with {} LEDs", name, config.num_leds);
                let light = Light::new(&name, &config, client);
                (name, Mutex::new(light))
            })
            .collect();

        Controller {
            lights,
            animation_factory,
            finished_sender,
            finished_receiver: Some(finished_receiver),
        }
    }
}
