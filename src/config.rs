//! Swarm configuration: particle count, colors, smoothing and timing constants.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, SwarmError};

pub const PARTICLE_COUNT: usize = 20_000;
pub const PARTICLE_SIZE: f32 = 0.5;
pub const TEXT_SAMPLE_STRIDE: usize = 3;
pub const SMOOTHING: f32 = 0.05;
pub const TICK_INCREMENT: f64 = 0.01;
pub const TEMPLATE_ACCEPTANCE: f32 = 8.0;

pub const COLOR_START: u32 = 0x00aaff;
pub const COLOR_END: u32 = 0xff00aa;

/// Pixel space the template matcher expects landmarks in
pub const VIDEO_WIDTH: f32 = 640.0;
pub const VIDEO_HEIGHT: f32 = 480.0;
pub const DEPTH_SCALE: f32 = 100.0;

/// Gradient endpoints for particle colors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorConfig {
    pub start: u32,
    pub end: u32,
    pub brightness_boost: f32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            start: COLOR_START,
            end: COLOR_END,
            brightness_boost: 1.5,
        }
    }
}

impl ColorConfig {
    /// Color at `mix` along the gradient, boosted and clamped to 1.0 per channel
    pub fn sample(&self, mix: f32) -> Vec3 {
        let start = hex_to_rgb(self.start);
        let end = hex_to_rgb(self.end);
        (start.lerp(end, mix) * self.brightness_boost).min(Vec3::ONE)
    }
}

/// 0xRRGGBB → linear 0..1 channels
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwarmConfig {
    pub particle_count: usize,
    pub particle_size: f32,
    pub colors: ColorConfig,
    /// Fraction of the remaining distance covered per tick
    pub smoothing: f32,
    pub text_sample_stride: usize,
    /// Animation clock advance per render tick (not wall time)
    pub tick_increment: f64,
    /// Ticks a state must be held before another change is accepted; 0 disables
    pub min_dwell_ticks: u32,
    /// Template matcher scores must exceed this to override finger counting
    pub template_acceptance: f32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            particle_size: PARTICLE_SIZE,
            colors: ColorConfig::default(),
            smoothing: SMOOTHING,
            text_sample_stride: TEXT_SAMPLE_STRIDE,
            tick_increment: TICK_INCREMENT,
            min_dwell_ticks: 0,
            template_acceptance: TEMPLATE_ACCEPTANCE,
        }
    }
}

impl SwarmConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SwarmError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_json_str(&contents)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, SwarmError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SwarmError> {
        if self.particle_count == 0 {
            return Err(invalid("particle_count", "Particle count must be greater than 0"));
        }

        if !(self.smoothing > 0.0 && self.smoothing < 1.0) {
            return Err(invalid("smoothing", "Smoothing must be strictly between 0.0 and 1.0"));
        }

        if self.text_sample_stride == 0 {
            return Err(invalid(
                "text_sample_stride",
                "Sampling stride must be greater than 0",
            ));
        }

        if !(self.tick_increment > 0.0) {
            return Err(invalid("tick_increment", "Tick increment must be positive"));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> SwarmError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}
