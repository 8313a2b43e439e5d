use lightfx::{Color, Frame, FrameError};
use serde::Deserialize;
use serde_json::Value;

use super::bouncing_ball::{BouncingBall, BouncingBallConfig};
use super::config::{self, ConfigError};
use super::{Animation, AnimationContext};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BouncingBallsConfig {
    pub balls: Vec<BouncingBallConfig>,
}

impl Default for BouncingBallsConfig {
    fn default() -> Self {
        let ball = |bounciness, color| BouncingBallConfig {
            bounciness,
            trail_length: 3,
            color,
            ..Default::default()
        };

        Self {
            balls: vec![
                ball(0.75, Color::rgb(255, 179, 186)),
                ball(0.8, Color::rgb(186, 255, 201)),
                ball(0.85, Color::rgb(186, 225, 255)),
            ],
        }
    }
}

impl BouncingBallsConfig {
    pub fn parse(value: &Value) -> Result<Self, ConfigError> {
        let config: Self = config::deserialize(value)?;
        if config.balls.is_empty() {
            return Err(ConfigError::new("balls", "at least one ball is required"));
        }
        for (i, ball) in config.balls.iter().enumerate() {
            ball.validate(&format!("balls[{i}]."))?;
        }
        Ok(config)
    }
}

/// Several independent balls drawn into one frame. Runs until stopped, even
/// once every ball has come to rest.
pub struct BouncingBalls {
    balls: Vec<BouncingBall>,
}

impl BouncingBalls {
    pub fn new(config: BouncingBallsConfig, context: &AnimationContext) -> Self {
        Self {
            balls: config
                .balls
                .into_iter()
                .map(|ball| BouncingBall::new(ball, context).without_clearing())
                .collect(),
        }
    }

    pub fn balls(&self) -> &[BouncingBall] {
        &self.balls
    }
}

impl Animation for BouncingBalls {
    fn animation_name(&self) -> &str {
        "BouncingBalls"
    }

    fn next_frame(&mut self, frame: &mut Frame) -> Result<bool, FrameError> {
        frame.clear();
        for ball in self.balls.iter_mut() {
            ball.next_frame(frame)?;
        }
        Ok(false)
    }
}
