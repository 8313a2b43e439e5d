use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Color;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("pixel index {index} out of range for frame of {len} pixels")]
    IndexOutOfRange { index: usize, len: usize },
}

/// The desired state of every LED of one fixture.
///
/// The number of pixels is fixed when the frame is created; none of the
/// operations below change it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pixels: Vec<Color>,
}

impl Frame {
    pub fn new(number_of_lights: usize, color: Color) -> Self {
        Self {
            pixels: vec![color; number_of_lights],
        }
    }

    pub fn new_black(number_of_lights: usize) -> Self {
        Self::new(number_of_lights, Color::black())
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Index of the last pixel. Zero for an empty frame.
    pub fn max_index(&self) -> usize {
        self.pixels.len().saturating_sub(1)
    }

    pub fn get(&self, index: usize) -> Result<Color, FrameError> {
        self.pixels
            .get(index)
            .copied()
            .ok_or(FrameError::IndexOutOfRange {
                index,
                len: self.pixels.len(),
            })
    }

    pub fn set_pixel(&mut self, index: usize, color: Color) -> Result<(), FrameError> {
        self.set_pixel_with_brightness(index, color, 1.0)
    }

    pub fn set_pixel_with_brightness(
        &mut self,
        index: usize,
        color: Color,
        brightness: f64,
    ) -> Result<(), FrameError> {
        let len = self.pixels.len();
        let pixel = self
            .pixels
            .get_mut(index)
            .ok_or(FrameError::IndexOutOfRange { index, len })?;
        *pixel = color.scaled(brightness);
        Ok(())
    }

    pub fn fill(&mut self, color: Color) {
        self.fill_with_brightness(color, 1.0);
    }

    pub fn fill_with_brightness(&mut self, color: Color, brightness: f64) {
        let color = color.scaled(brightness);
        self.pixels.iter_mut().for_each(|pixel| *pixel = color);
    }

    pub fn clear(&mut self) {
        self.fill(Color::black());
    }

    /// Interpolates every component independently from `start` at the first
    /// pixel towards `end`. The step is `(end - start) / len`, so the last
    /// pixel stops one step short of `end`.
    pub fn gradient(&mut self, start: Color, end: Color) {
        let len = self.pixels.len() as f64;
        let lerp_component = |a: u8, b: u8, i: usize| {
            let step = (b as f64 - a as f64) / len;
            (a as f64 + i as f64 * step).round().clamp(0.0, 255.0) as u8
        };

        for (i, pixel) in self.pixels.iter_mut().enumerate() {
            *pixel = Color {
                r: lerp_component(start.r, end.r, i),
                g: lerp_component(start.g, end.g, i),
                b: lerp_component(start.b, end.b, i),
            };
        }
    }

    /// Lights the leading `ceil(len * percentage / 100)` pixels with `on` and
    /// the rest with `off`. Percentages are clamped to the 0 to 100 range.
    pub fn percentage_split(&mut self, percentage: f64, on: Color, off: Color) {
        let len = self.pixels.len();
        let on_count = (len as f64 * percentage.clamp(0.0, 100.0) / 100.0).ceil() as usize;
        let on_count = on_count.min(len);

        for (i, pixel) in self.pixels.iter_mut().enumerate() {
            *pixel = if i < on_count { on } else { off };
        }
    }

    pub fn pixels_iter(&self) -> impl Iterator<Item = &Color> {
        self.pixels.iter()
    }
}

impl<T> From<T> for Frame
where
    T: Iterator<Item = Color>,
{
    fn from(iter: T) -> Self {
        Self {
            pixels: iter.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reds(frame: &Frame) -> Vec<u8> {
        frame.pixels_iter().map(|c| c.r).collect()
    }

    #[test]
    fn set_pixel_out_of_range() {
        let mut frame = Frame::new_black(3);
        assert_eq!(
            frame.set_pixel(3, Color::white()),
            Err(FrameError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            frame.get(7),
            Err(FrameError::IndexOutOfRange { index: 7, len: 3 })
        );
        assert_eq!(frame, Frame::new_black(3));
    }

    #[test]
    fn set_pixel_with_brightness() {
        let mut frame = Frame::new_black(3);
        frame
            .set_pixel_with_brightness(1, Color::rgb(255, 10, 0), 0.5)
            .unwrap();
        assert_eq!(frame.get(1), Ok(Color::rgb(128, 5, 0)));
        assert_eq!(frame.get(0), Ok(Color::black()));
    }

    #[test]
    fn fill_and_clear() {
        let mut frame = Frame::new_black(4);
        frame.fill(Color::white());
        assert!(frame.pixels_iter().all(|c| *c == Color::white()));

        frame.fill_with_brightness(Color::white(), 0.25);
        assert!(frame.pixels_iter().all(|c| *c == Color::gray(64)));

        frame.clear();
        assert_eq!(frame, Frame::new_black(4));
        assert_eq!(frame.len(), 4);
    }

    #[test]
    fn gradient() {
        let mut frame = Frame::new_black(10);
        frame.gradient(Color::black(), Color::rgb(90, 0, 0));
        assert_eq!(reds(&frame), vec![0, 9, 18, 27, 36, 45, 54, 63, 72, 81]);
        assert!(frame.pixels_iter().all(|c| c.g == 0 && c.b == 0));
    }

    #[test]
    fn gradient_descending() {
        let mut frame = Frame::new_black(4);
        frame.gradient(Color::rgb(0, 200, 0), Color::black());
        let greens: Vec<_> = frame.pixels_iter().map(|c| c.g).collect();
        assert_eq!(greens, vec![200, 150, 100, 50]);
    }

    #[test]
    fn percentage_split() {
        let mut frame = Frame::new_black(5);
        frame.percentage_split(50.0, Color::gray(1), Color::black());
        assert_eq!(reds(&frame), vec![1, 1, 1, 0, 0]);

        frame.percentage_split(0.0, Color::gray(1), Color::gray(2));
        assert_eq!(reds(&frame), vec![2, 2, 2, 2, 2]);

        frame.percentage_split(100.0, Color::gray(1), Color::gray(2));
        assert_eq!(reds(&frame), vec![1, 1, 1, 1, 1]);
    }
}
