//! Alternating blue and white flashes on the two halves of the fixture.
//!
//! Each half runs through blue up, blue down, white up, white down, then the
//! fixture pauses briefly and the other half takes over.

use lightfx::{Color, Frame, FrameError};
use serde::Deserialize;
use serde_json::Value;

use super::config::{self, check_range, ConfigError};
use super::{Animation, AnimationContext};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoliceConfig {
    pub speed_multiplier: f64,
}

impl Default for PoliceConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
        }
    }
}

impl PoliceConfig {
    pub fn parse(value: &Value) -> Result<Self, ConfigError> {
        let config: Self = config::deserialize(value)?;
        check_range("speed_multiplier", config.speed_multiplier, 0.0..)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Blue,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ramp {
    Up,
    Down,
}

pub struct Police {
    brightness_step: i32,
    pause_frames: u32,
    brightness: i32,
    half: Half,
    tone: Tone,
    ramp: Ramp,
    frames_waited: u32,
}

impl Police {
    pub fn new(config: PoliceConfig, context: &AnimationContext) -> Self {
        let step = (90.0 * config.speed_multiplier * (30.0 / context.fps)).round();
        Self {
            brightness_step: step.clamp(0.0, 255.0) as i32,
            pause_frames: (context.fps / 10.0).round().max(0.0) as u32,
            brightness: 1,
            half: Half::Top,
            tone: Tone::Blue,
            ramp: Ramp::Up,
            frames_waited: 0,
        }
    }

    pub fn brightness(&self) -> u8 {
        self.brightness as u8
    }

    pub fn active_half(&self) -> Half {
        self.half
    }

    fn target_color(&self) -> Color {
        let brightness = self.brightness();
        match self.tone {
            Tone::Blue => Color::rgb(0, 0, brightness),
            Tone::White => Color::gray(brightness),
        }
    }
}

impl Animation for Police {
    fn animation_name(&self) -> &str {
        "Police"
    }

    fn next_frame(&mut self, frame: &mut Frame) -> Result<bool, FrameError> {
        if self.brightness == 0 && self.tone == Tone::White && self.ramp == Ramp::Down {
            if self.frames_waited < self.pause_frames {
                self.frames_waited += 1;
                return Ok(false);
            }
            self.half = match self.half {
                Half::Top => Half::Bottom,
                Half::Bottom => Half::Top,
            };
            self.frames_waited = 0;
        }

        if self.brightness == 255 {
            self.ramp = Ramp::Down;
        } else if self.brightness == 0 {
            self.ramp = Ramp::Up;
            self.tone = match self.tone {
                Tone::Blue => Tone::White,
                Tone::White => Tone::Blue,
            };
        }

        self.brightness = match self.ramp {
            Ramp::Up => self.brightness + self.brightness_step,
            Ramp::Down => self.brightness - self.brightness_step,
        }
        .clamp(0, 255);

        let target = self.target_color();
        match self.half {
            Half::Top => frame.percentage_split(50.0, target, Color::black()),
            Half::Bottom => frame.percentage_split(50.0, Color::black(), target),
        }
        Ok(false)
    }
}
