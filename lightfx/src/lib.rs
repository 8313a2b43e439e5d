mod color;
mod frame;

pub use color::Color;
pub use frame::{Frame, FrameError};
