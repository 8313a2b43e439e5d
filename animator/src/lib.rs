pub mod animations;
pub mod config;
mod controller;
pub mod factory;
mod light;
pub mod runner;

pub use config::{ControllerConfig, LightConfig, SettingsError};
pub use controller::{AnimationFinished, Controller, ControllerBuilder, ControllerError};
pub use factory::{AnimationFactory, AnimationFactoryError};
pub use light::Light;
pub use runner::{AnimationRunner, OnComplete};
