use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Produces a color with given RGB values. The values range from 0 to 255.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Produces a gray of the given brightness, where 0 is black and 255 is white.
    pub fn gray(brightness: u8) -> Self {
        Self::rgb(brightness, brightness, brightness)
    }

    pub fn black() -> Self {
        Self::gray(0)
    }

    pub fn white() -> Self {
        Self::gray(255)
    }

    /// Produces a version of the color with every component multiplied by
    /// `brightness` and rounded to the nearest integer. The result of each
    /// multiplication is clamped to the 0 to 255 range.
    pub fn scaled(self, brightness: f64) -> Self {
        let scale_component = |c| ((c as f64) * brightness).round().clamp(0.0, 255.0) as u8;
        Self {
            r: scale_component(self.r),
            g: scale_component(self.g),
            b: scale_component(self.b),
        }
    }

    /// Moves every component towards the matching component of `target` by at
    /// most `step`, never overshooting it.
    pub fn step_towards(self, target: &Self, step: u32) -> Self {
        let step_component = |c: u8, t: u8| {
            let (c, t) = (c as u32, t as u32);
            if c > t {
                c.saturating_sub(step).max(t) as u8
            } else {
                c.saturating_add(step).min(t) as u8
            }
        };

        Self {
            r: step_component(self.r, target.r),
            g: step_component(self.g, target.g),
            b: step_component(self.b, target.b),
        }
    }

    pub fn components(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling() {
        assert_eq!(Color::white().scaled(1.0), Color::white());
        assert_eq!(Color::white().scaled(0.0), Color::black());
        assert_eq!(Color::rgb(255, 100, 3).scaled(0.5), Color::rgb(128, 50, 2));
        assert_eq!(
            Color::rgb(200, 200, 200).scaled(2.0),
            Color::white(),
            "clamped"
        );
    }

    #[test]
    fn stepping() {
        let target = Color::rgb(100, 0, 50);
        assert_eq!(
            Color::rgb(0, 255, 50).step_towards(&target, 20),
            Color::rgb(20, 235, 50)
        );
        assert_eq!(
            Color::rgb(90, 10, 60).step_towards(&target, 20),
            target,
            "never overshoots"
        );
        assert_eq!(
            Color::white().step_towards(&Color::black(), 300),
            Color::black()
        );
    }
}
