use lightfx::{Color, Frame, FrameError};
use serde::Deserialize;
use serde_json::Value;

use super::config::{self, check_range, ConfigError};
use super::{Animation, AnimationContext};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BouncingBallConfig {
    /// Share of the speed kept after hitting the floor, from 0 to 1.
    pub bounciness: f64,
    pub terminal_velocity: u32,
    pub gravity: f64,
    #[serde(rename = "colour", deserialize_with = "config::rgb")]
    pub color: Color,
    pub trail_length: usize,
    /// Defaults to the last LED of the fixture.
    pub max_height: Option<usize>,
    /// Defaults to `max_height`.
    pub starting_height: Option<usize>,
    pub invert: bool,
}

impl Default for BouncingBallConfig {
    fn default() -> Self {
        Self {
            bounciness: 0.8,
            terminal_velocity: 3,
            gravity: 0.05,
            color: Color::white(),
            trail_length: 3,
            max_height: None,
            starting_height: None,
            invert: false,
        }
    }
}

impl BouncingBallConfig {
    pub fn parse(value: &Value) -> Result<Self, ConfigError> {
        let config: Self = config::deserialize(value)?;
        config.validate("")?;
        Ok(config)
    }

    /// Checks the ranges serde cannot express. `prefix` is prepended to field
    /// names, e.g. `balls[2].`.
    pub(crate) fn validate(&self, prefix: &str) -> Result<(), ConfigError> {
        check_range(format!("{prefix}bounciness"), self.bounciness, 0.0..=1.0)?;
        check_range(format!("{prefix}gravity"), self.gravity, 0.0..)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Falling,
    Rising,
}

/// A ball dropped from `starting_height` that bounces on LED 0 until it comes
/// to rest, leaving a trail whose length follows its speed.
pub struct BouncingBall {
    config: BouncingBallConfig,
    max_index: usize,
    max_height: f64,
    phase: Phase,
    height: f64,
    speed: f64,
    finished: bool,
    clear_frame: bool,
}

impl BouncingBall {
    pub fn new(config: BouncingBallConfig, context: &AnimationContext) -> Self {
        let max_index = context.max_index();
        let max_height = config.max_height.unwrap_or(max_index).min(max_index);
        let starting_height = config.starting_height.unwrap_or(max_height).min(max_height);

        Self {
            config,
            max_index,
            max_height: max_height as f64,
            phase: Phase::Falling,
            height: starting_height as f64,
            speed: 0.0,
            finished: false,
            clear_frame: true,
        }
    }

    /// Stops the ball from clearing the frame before drawing itself, so that
    /// several balls can share one frame.
    pub fn without_clearing(mut self) -> Self {
        self.clear_frame = false;
        self
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn update(&mut self) {
        let gravity = self.config.gravity;
        match self.phase {
            Phase::Falling => {
                self.speed = (self.speed + gravity).min(self.terminal_velocity());
                self.height -= self.speed;
                if self.height <= 0.0 {
                    self.height = 0.0;
                    self.phase = Phase::Rising;
                    self.speed *= self.config.bounciness;
                }
            }
            Phase::Rising => {
                self.speed = (self.speed - gravity).max(0.0);
                self.height = (self.height + self.speed).min(self.max_height);
            }
        }

        if self.phase == Phase::Rising && self.speed <= 0.0 {
            self.phase = Phase::Falling;
            if self.height.round() == 0.0 {
                self.finished = true;
            }
        }
    }

    fn terminal_velocity(&self) -> f64 {
        self.config.terminal_velocity as f64
    }

    fn led_index(&self) -> usize {
        let position = self.height.round() as usize;
        if self.config.invert {
            self.max_index.saturating_sub(position)
        } else {
            position
        }
    }

    fn trail_length(&self) -> usize {
        if self.config.terminal_velocity == 0 {
            return 0;
        }
        (self.config.trail_length as f64 * self.speed / self.terminal_velocity()).round() as usize
    }

    fn draw(&self, frame: &mut Frame) -> Result<(), FrameError> {
        if self.clear_frame {
            frame.clear();
        }

        let ball = self.led_index();
        frame.set_pixel(ball, self.config.color)?;

        // The trail points away from the direction of travel and ends at the
        // edge of the fixture, however long it is configured.
        let towards_floor = self.config.invert == (self.phase == Phase::Falling);
        let trail_length = self.trail_length();
        for step in 1..=trail_length {
            let index = if towards_floor {
                ball.checked_sub(step)
            } else {
                ball.checked_add(step)
            };
            let Some(index) = index.filter(|index| *index < frame.len()) else {
                break;
            };
            let brightness = (trail_length - step + 1) as f64 / (trail_length as f64 + 1.0);
            frame.set_pixel_with_brightness(index, self.config.color, brightness)?;
        }

        Ok(())
    }
}

impl Animation for BouncingBall {
    fn animation_name(&self) -> &str {
        "BouncingBall"
    }

    fn next_frame(&mut self, frame: &mut Frame) -> Result<bool, FrameError> {
        if !self.finished {
            self.update();
        }
        self.draw(frame)?;
        Ok(self.finished)
    }
}
