use lightfx::{Color, Frame, FrameError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use serde_json::Value;

use super::config::{self, check_range, ConfigError};
use super::{Animation, AnimationContext};

/// Only this many cells at the bottom of the fixture can ignite.
const SPARK_ZONE: usize = 8;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FireConfig {
    pub cooling: u32,
    pub sparking: u32,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            cooling: 55,
            sparking: 120,
        }
    }
}

impl FireConfig {
    pub fn parse(value: &Value) -> Result<Self, ConfigError> {
        let config: Self = config::deserialize(value)?;
        check_range("cooling", config.cooling, 1..)?;
        check_range("sparking", config.sparking, 1..)?;
        Ok(config)
    }
}

/// Heat diffusion flame rising from LED 0.
///
/// The heat map starts cold on every frame, so each frame shows at most one
/// fresh spark near the base.
pub struct Fire {
    config: FireConfig,
    heat: Vec<f64>,
    rng: StdRng,
}

impl Fire {
    pub fn new(config: FireConfig, context: &AnimationContext) -> Self {
        Self::with_rng(config, context, StdRng::from_entropy())
    }

    pub fn with_rng(config: FireConfig, context: &AnimationContext, rng: StdRng) -> Self {
        Self {
            config,
            heat: Vec::with_capacity(context.light_count),
            rng,
        }
    }

    fn simulate(&mut self, light_count: usize) {
        self.heat.clear();
        self.heat.resize(light_count, 0.0);

        // Step 1: cool every cell a little
        let max_cooldown = (self.config.cooling as f64 * 10.0) / light_count as f64 + 2.0;
        for heat in self.heat.iter_mut() {
            let cooldown = self.rng.gen_range(0.0..=max_cooldown);
            *heat = (*heat - cooldown).max(0.0);
        }

        // Step 2: heat drifts up and diffuses
        for k in (2..light_count).rev() {
            self.heat[k] = (self.heat[k - 1] + 2.0 * self.heat[k - 2]) / 3.0;
        }

        // Step 3: maybe ignite a spark near the bottom
        let spark_chance = (self.config.sparking as f64 / 255.0).min(1.0);
        if self.rng.gen_bool(spark_chance) {
            let y = self.rng.gen_range(0..light_count.min(SPARK_ZONE));
            self.heat[y] += self.rng.gen_range(160..=255) as f64;
        }
    }
}

/// Maps heat onto a black, red, yellow, white ramp.
pub fn heat_color(temperature: f64) -> Color {
    let t192 = (temperature.clamp(0.0, 255.0) / 255.0 * 191.0).round() as u8;
    let heat_ramp = (t192 & 0x3F) << 2;

    if t192 > 128 {
        Color::rgb(255, 255, heat_ramp)
    } else if t192 > 64 {
        Color::rgb(255, heat_ramp, 0)
    } else {
        Color::rgb(heat_ramp, 0, 0)
    }
}

impl Animation for Fire {
    fn animation_name(&self) -> &str {
        "Fire"
    }

    fn next_frame(&mut self, frame: &mut Frame) -> Result<bool, FrameError> {
        let light_count = frame.len();
        if light_count == 0 {
            return Ok(false);
        }

        self.simulate(light_count);
        for (i, heat) in self.heat.iter().enumerate() {
            frame.set_pixel(i, heat_color(*heat))?;
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fire(config: FireConfig, light_count: usize, seed: u64) -> Fire {
        let context = AnimationContext {
            light_count,
            fps: 30.0,
        };
        Fire::with_rng(config, &context, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn config() {
        assert_eq!(FireConfig::parse(&json!({})).unwrap(), FireConfig::default());
        assert_eq!(
            FireConfig::parse(&json!({ "cooling": 0 })).unwrap_err().field,
            "cooling"
        );
        assert_eq!(
            FireConfig::parse(&json!({ "sparking": 1.5 })).unwrap_err().field,
            "sparking"
        );
    }

    #[test]
    fn heat_ramp() {
        assert_eq!(heat_color(0.0), Color::black());
        assert_eq!(heat_color(100.0), Color::rgb(255, 44, 0));
        assert_eq!(heat_color(255.0), Color::rgb(255, 255, 252));
        assert_eq!(heat_color(1000.0), heat_color(255.0));
        assert_eq!(heat_color(-4.0), Color::black());
    }

    #[test]
    fn only_the_base_ignites() {
        let mut fire = fire(FireConfig::default(), 30, 7);
        let mut frame = Frame::new_black(30);
        let mut lit_frames = 0;

        for _ in 0..200 {
            assert!(!fire.next_frame(&mut frame).unwrap());
            let lit: Vec<_> = frame
                .pixels_iter()
                .enumerate()
                .filter(|(_, c)| **c != Color::black())
                .map(|(i, _)| i)
                .collect();
            assert!(lit.len() <= 1);
            assert!(lit.iter().all(|i| *i < SPARK_ZONE));
            lit_frames += lit.len();
        }
        assert!(lit_frames > 0);
    }

    #[test]
    fn always_sparking_on_tiny_fixture() {
        let config = FireConfig {
            cooling: 1000,
            sparking: 1000,
        };
        let mut fire = fire(config, 3, 1);
        let mut frame = Frame::new_black(3);
        for _ in 0..50 {
            fire.next_frame(&mut frame).unwrap();
            assert_eq!(frame.len(), 3);
            assert_eq!(
                frame
                    .pixels_iter()
                    .filter(|c| **c != Color::black())
                    .count(),
                1
            );
        }
    }

    #[test]
    fn same_seed_same_flames() {
        let mut a = fire(FireConfig::default(), 16, 42);
        let mut b = fire(FireConfig::default(), 16, 42);
        let (mut frame_a, mut frame_b) = (Frame::new_black(16), Frame::new_black(16));
        for _ in 0..20 {
            a.next_frame(&mut frame_a).unwrap();
            b.next_frame(&mut frame_b).unwrap();
            assert_eq!(frame_a, frame_b);
        }
    }
}
