use std::collections::HashMap;

use itertools::Itertools;
use log::debug;
use serde_json::Value;
use thiserror::Error;

use crate::animations::{
    Animation, AnimationContext, BouncingBall, BouncingBallConfig, BouncingBalls,
    BouncingBallsConfig, ConfigError, FadeSequence, FadeSequenceConfig, Fire, FireConfig, Police,
    PoliceConfig, Sparkle, SparkleConfig,
};

#[derive(Debug, Error, PartialEq)]
pub enum AnimationFactoryError {
    #[error("unknown animation \"{0}\"")]
    UnknownAnimation(String),

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

type Constructor = fn(&Value, &AnimationContext) -> Result<Box<dyn Animation>, ConfigError>;

struct Registration {
    name: &'static str,
    make: Constructor,
}

/// Builds animations from their name and raw configuration. Names are matched
/// case-insensitively.
pub struct AnimationFactory {
    animations: HashMap<String, Registration>,
}

impl Default for AnimationFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationFactory {
    pub fn new() -> Self {
        let mut factory = Self {
            animations: HashMap::new(),
        };
        factory.register("BouncingBall", |config, context| {
            let config = BouncingBallConfig::parse(config)?;
            Ok(Box::new(BouncingBall::new(config, context)))
        });
        factory.register("BouncingBalls", |config, context| {
            let config = BouncingBallsConfig::parse(config)?;
            Ok(Box::new(BouncingBalls::new(config, context)))
        });
        factory.register("FadeSequence", |config, context| {
            let config = FadeSequenceConfig::parse(config)?;
            Ok(Box::new(FadeSequence::new(config, context)?))
        });
        factory.register("Fire", |config, context| {
            let config = FireConfig::parse(config)?;
            Ok(Box::new(Fire::new(config, context)))
        });
        factory.register("Police", |config, context| {
            let config = PoliceConfig::parse(config)?;
            Ok(Box::new(Police::new(config, context)))
        });
        factory.register("Sparkle", |config, _| {
            let config = SparkleConfig::parse(config)?;
            Ok(Box::new(Sparkle::new(config)))
        });
        factory
    }

    fn register(&mut self, name: &'static str, make: Constructor) {
        self.animations
            .insert(name.to_lowercase(), Registration { name, make });
    }

    /// Names of every known animation in alphabetical order.
    pub fn list(&self) -> Vec<&'static str> {
        self.animations
            .values()
            .map(|registration| registration.name)
            .sorted()
            .collect()
    }

    pub fn make(
        &self,
        name: &str,
        config: &Value,
        context: &AnimationContext,
    ) -> Result<Box<dyn Animation>, AnimationFactoryError> {
        let Some(registration) = self.animations.get(&name.to_lowercase()) else {
            return Err(AnimationFactoryError::UnknownAnimation(name.to_owned()));
        };

        debug!("Making animation {} with config {}", registration.name, config);
        Ok((registration.make)(config, context)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const CONTEXT: AnimationContext = AnimationContext {
        light_count: 12,
        fps: 30.0,
    };

    #[test]
    fn lists_every_animation() {
        assert_eq!(
            AnimationFactory::new().list(),
            vec![
                "BouncingBall",
                "BouncingBalls",
                "FadeSequence",
                "Fire",
                "Police",
                "Sparkle"
            ]
        );
    }

    #[test]
    fn names_are_case_insensitive() {
        let factory = AnimationFactory::new();
        for name in ["fire", "FIRE", "Fire", "fIrE"] {
            let animation = factory.make(name, &json!({}), &CONTEXT).unwrap();
            assert_eq!(animation.animation_name(), "Fire");
        }
        let animation = factory
            .make("bouncingballs", &Value::Null, &CONTEXT)
            .unwrap();
        assert_eq!(animation.animation_name(), "BouncingBalls");
    }

    #[test]
    fn unknown_animation() {
        let result = AnimationFactory::new().make("disco", &json!({}), &CONTEXT);
        assert_eq!(
            result.err(),
            Some(AnimationFactoryError::UnknownAnimation("disco".into()))
        );
    }

    #[test]
    fn invalid_config() {
        let factory = AnimationFactory::new();
        let result = factory.make("police", &json!({ "speed_multiplier": "fast" }), &CONTEXT);
        let Err(AnimationFactoryError::InvalidConfig(error)) = result else {
            panic!("expected an invalid config error");
        };
        assert_eq!(error.field, "speed_multiplier");

        let result = factory.make("fadesequence", &json!({}), &CONTEXT);
        assert!(matches!(
            result,
            Err(AnimationFactoryError::InvalidConfig(ConfigError { .. }))
        ));
    }

    #[test]
    fn every_animation_renders_with_defaults() {
        let factory = AnimationFactory::new();
        let mut frame = lightfx::Frame::new_black(CONTEXT.light_count);
        for name in factory.list() {
            let config = match name {
                "FadeSequence" => json!({ "sequence": [0, 11] }),
                _ => json!({}),
            };
            let mut animation = factory.make(name, &config, &CONTEXT).unwrap();
            for _ in 0..50 {
                animation.next_frame(&mut frame).unwrap();
            }
            assert_eq!(frame.len(), CONTEXT.light_count);
        }
    }
}
