mod animation;
pub mod config;

pub mod bouncing_ball;
pub mod bouncing_balls;
pub mod fade_sequence;
pub mod fire;
pub mod police;
pub mod sparkle;

pub use animation::{Animation, AnimationContext};
pub use bouncing_ball::{BouncingBall, BouncingBallConfig};
pub use bouncing_balls::{BouncingBalls, BouncingBallsConfig};
pub use config::ConfigError;
pub use fade_sequence::{FadeSequence, FadeSequenceConfig};
pub use fire::{Fire, FireConfig};
pub use police::{Police, PoliceConfig};
pub use sparkle::{Sparkle, SparkleConfig};
