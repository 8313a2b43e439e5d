use std::collections::BTreeMap;
use std::path::Path;

use maestro_light_client::protocols::MAX_DRGB_PIXELS;
use maestro_light_client::LightsConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runner::DEFAULT_FPS;

const MAX_FPS: f64 = 1000.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {reason}")]
    Invalid { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    #[serde(flatten)]
    pub endpoint: LightsConfig,
    pub num_leds: usize,
    #[serde(default = "default_fps")]
    pub animation_fps: f64,
}

fn default_fps() -> f64 {
    DEFAULT_FPS
}

impl LightConfig {
    fn validate(&self, name: &str) -> Result<(), SettingsError> {
        let invalid = |reason: String| Err(SettingsError::Invalid { reason });

        if self.num_leds == 0 {
            return invalid(format!("light \"{name}\" needs at least one LED"));
        }
        if self.num_leds > MAX_DRGB_PIXELS {
            return invalid(format!(
                "light \"{name}\" has {} LEDs, at most {MAX_DRGB_PIXELS} are supported",
                self.num_leds
            ));
        }
        if !(self.animation_fps > 0.0 && self.animation_fps <= MAX_FPS) {
            return invalid(format!(
                "light \"{name}\" frame rate must be in (0, {MAX_FPS}], got {}",
                self.animation_fps
            ));
        }
        Ok(())
    }
}

/// Every fixture the controller drives, keyed by light name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub lights: BTreeMap<String, LightConfig>,
}

impl ControllerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.lights.is_empty() {
            return Err(SettingsError::Invalid {
                reason: "no lights configured".into(),
            });
        }
        self.lights
            .iter()
            .try_for_each(|(name, light)| light.validate(name))
    }
}

#[cfg(test)]
mod tests {
    use maestro_light_client::DEFAULT_TIMEOUT;

    use super::*;

    #[test]
    fn parses_lights_with_defaults() {
        let config = ControllerConfig::from_toml_str(
            r#"
            [lights.desk]
            host = "192.168.1.40"
            port = 21324
            num_leds = 60

            [lights.window]
            host = "192.168.1.41"
            port = 21324
            num_leds = 120
            animation_fps = 60
            timeout = 5
            "#,
        )
        .unwrap();

        let names: Vec<_> = config.lights.keys().map(String::as_str).collect();
        assert_eq!(names, ["desk", "window"]);

        let desk = &config.lights["desk"];
        assert_eq!(desk.endpoint.address(), "192.168.1.40:21324");
        assert_eq!(desk.endpoint.timeout, DEFAULT_TIMEOUT);
        assert_eq!(desk.animation_fps, DEFAULT_FPS);

        let window = &config.lights["window"];
        assert_eq!(window.num_leds, 120);
        assert_eq!(window.animation_fps, 60.0);
        assert_eq!(window.endpoint.timeout, 5);
    }

    #[test]
    fn rejects_invalid_lights() {
        for toml in [
            "lights = {}",
            r#"lights.a = { host = "h", port = 1, num_leds = 0 }"#,
            r#"lights.a = { host = "h", port = 1, num_leds = 491 }"#,
            r#"lights.a = { host = "h", port = 1, num_leds = 5, animation_fps = 0 }"#,
            r#"lights.a = { host = "h", port = 1, num_leds = 5, animation_fps = 1001 }"#,
        ] {
            assert!(
                matches!(
                    ControllerConfig::from_toml_str(toml),
                    Err(SettingsError::Invalid { .. })
                ),
                "{toml}"
            );
        }
    }

    #[test]
    fn reports_malformed_toml() {
        assert!(matches!(
            ControllerConfig::from_toml_str(r#"lights.a = { host = "h" }"#),
            Err(SettingsError::Toml(_))
        ));
        assert!(matches!(
            ControllerConfig::from_file("/nonexistent/maestro.toml"),
            Err(SettingsError::Io(_))
        ));
    }
}
