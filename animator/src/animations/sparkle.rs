use lightfx::{Color, Frame, FrameError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use serde_json::Value;

use super::config::{self, ConfigError};
use super::Animation;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SparkleConfig {
    /// Also accepted as `rgb`, but not both at once.
    #[serde(rename = "colour", alias = "rgb", deserialize_with = "config::rgb")]
    pub color: Color,
}

impl Default for SparkleConfig {
    fn default() -> Self {
        Self {
            color: Color::white(),
        }
    }
}

impl SparkleConfig {
    pub fn parse(value: &Value) -> Result<Self, ConfigError> {
        config::deserialize(value)
    }
}

/// Lights a single random LED per frame.
pub struct Sparkle {
    config: SparkleConfig,
    rng: StdRng,
}

impl Sparkle {
    pub fn new(config: SparkleConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: SparkleConfig, rng: StdRng) -> Self {
        Self { config, rng }
    }
}

impl Animation for Sparkle {
    fn animation_name(&self) -> &str {
        "Sparkle"
    }

    fn next_frame(&mut self, frame: &mut Frame) -> Result<bool, FrameError> {
        frame.clear();
        if !frame.is_empty() {
            let index = self.rng.gen_range(0..frame.len());
            frame.set_pixel(index, self.config.color)?;
        }
        Ok(false)
    }
}
