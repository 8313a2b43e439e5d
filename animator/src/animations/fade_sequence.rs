use lightfx::{Color, Frame, FrameError};
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use super::config::{self, ConfigError};
use super::{Animation, AnimationContext};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FadeSequenceConfig {
    pub sequence: Vec<usize>,
    #[serde(rename = "target_rgb", deserialize_with = "config::rgb")]
    pub target: Color,
    /// Largest change of a single channel per frame.
    pub speed: u32,
    pub clear_first: bool,
}

impl Default for FadeSequenceConfig {
    fn default() -> Self {
        Self {
            sequence: Vec::new(),
            target: Color::white(),
            speed: 20,
            clear_first: true,
        }
    }
}

impl FadeSequenceConfig {
    pub fn parse(value: &Value) -> Result<Self, ConfigError> {
        let config: Self = config::deserialize(value)?;
        if config.sequence.is_empty() {
            return Err(ConfigError::new(
                "sequence",
                "at least one LED index is required",
            ));
        }
        config::check_range("speed", config.speed, 1..)?;
        Ok(config)
    }
}

/// Fades the LEDs of `sequence` to the target colour one after another.
pub struct FadeSequence {
    sequence: Vec<usize>,
    target: Color,
    speed: u32,
    clear_first: bool,
    position: usize,
    cleared: bool,
}

impl FadeSequence {
    /// Indices past the end of the fixture are dropped. A sequence left
    /// without any index is rejected.
    pub fn new(config: FadeSequenceConfig, context: &AnimationContext) -> Result<Self, ConfigError> {
        let requested = config.sequence.len();
        let sequence: Vec<_> = config
            .sequence
            .into_iter()
            .filter(|index| *index < context.light_count)
            .collect();

        if sequence.is_empty() {
            return Err(ConfigError::new(
                "sequence",
                format!("no index lies within the {} LEDs", context.light_count),
            ));
        }
        if sequence.len() < requested {
            warn!(
                "Dropped {} out of range LED indices from the fade sequence",
                requested - sequence.len()
            );
        }

        Ok(Self {
            sequence,
            target: config.target,
            speed: config.speed,
            clear_first: config.clear_first,
            position: 0,
            cleared: false,
        })
    }

    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }
}

impl Animation for FadeSequence {
    fn animation_name(&self) -> &str {
        "FadeSequence"
    }

    fn next_frame(&mut self, frame: &mut Frame) -> Result<bool, FrameError> {
        if self.clear_first && !self.cleared {
            frame.clear();
        }
        self.cleared = true;

        let Some(&index) = self.sequence.get(self.position) else {
            return Ok(true);
        };

        let color = frame.get(index)?.step_towards(&self.target, self.speed);
        frame.set_pixel(index, color)?;
        if color == self.target {
            self.position += 1;
        }

        Ok(self.position >= self.sequence.len())
    }
}
