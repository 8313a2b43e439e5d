use lightfx::{Frame, FrameError};

/// What an animation knows about the fixture it is started on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationContext {
    pub light_count: usize,
    pub fps: f64,
}

impl AnimationContext {
    pub fn max_index(&self) -> usize {
        self.light_count.saturating_sub(1)
    }
}

pub trait Animation: Send {
    fn animation_name(&self) -> &str;

    /// Renders the next frame into `frame`. Returns `true` once the sequence
    /// is complete and no further frames should be requested.
    fn next_frame(&mut self, frame: &mut Frame) -> Result<bool, FrameError>;
}
