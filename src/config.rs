//! Tunables for the pet, with command-line overrides.

use clap::Parser;
use thiserror::Error;

use crate::pet::dwell::DwellRange;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} dwell range is empty: {min_ms}..{max_ms} ms")]
    EmptyDwell {
        name: &'static str,
        min_ms: f32,
        max_ms: f32,
    },

    #[error("{0} must be positive")]
    NotPositive(&'static str),
}

/// Behavior and footprint settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PetConfig {
    /// Walk speed in pixels/second.
    pub walk_speed: f32,
    pub idle_dwell: DwellRange,
    pub walk_dwell: DwellRange,
    /// Sprite frame edge in sheet pixels.
    pub frame_size: f32,
    pub sprite_scale: f32,
    /// Clickable box inside the frame, in sheet pixels.
    pub hit_width: f32,
    pub hit_height: f32,
    pub seed: Option<u64>,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            walk_speed: 60.0,
            idle_dwell: DwellRange::new(3000.0, 6000.0),
            walk_dwell: DwellRange::new(2000.0, 4000.0),
            frame_size: 64.0,
            sprite_scale: 2.0,
            hit_width: 40.0,
            hit_height: 32.0,
            seed: None,
        }
    }
}

impl PetConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, range) in [("idle", self.idle_dwell), ("walk", self.walk_dwell)] {
            if !(range.min_ms >= 0.0 && range.min_ms < range.max_ms) {
                return Err(ConfigError::EmptyDwell {
                    name,
                    min_ms: range.min_ms,
                    max_ms: range.max_ms,
                });
            }
        }
        let positives = [
            ("walk speed", self.walk_speed),
            ("frame size", self.frame_size),
            ("sprite scale", self.sprite_scale),
            ("hit width", self.hit_width),
            ("hit height", self.hit_height),
        ];
        for (name, v) in positives {
            if !(v > 0.0) {
                return Err(ConfigError::NotPositive(name));
            }
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Walk speed in pixels/second
    #[arg(long)]
    pub walk_speed: Option<f32>,

    /// Minimum idle dwell (ms)
    #[arg(long)]
    pub idle_min_ms: Option<f32>,

    /// Maximum idle dwell (ms)
    #[arg(long)]
    pub idle_max_ms: Option<f32>,

    /// Minimum walk dwell (ms)
    #[arg(long)]
    pub walk_min_ms: Option<f32>,

    /// Maximum walk dwell (ms)
    #[arg(long)]
    pub walk_max_ms: Option<f32>,

    /// Sprite scale multiplier
    #[arg(long)]
    pub scale: Option<f32>,

    /// Seed for reproducible wandering
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Args {
    /// Apply overrides on top of the defaults and validate the result.
    pub fn into_config(self) -> Result<PetConfig, ConfigError> {
        let mut cfg = PetConfig::default();
        if let Some(v) = self.walk_speed {
            cfg.walk_speed = v;
        }
        if let Some(v) = self.idle_min_ms {
            cfg.idle_dwell.min_ms = v;
        }
        if let Some(v) = self.idle_max_ms {
            cfg.idle_dwell.max_ms = v;
        }
        if let Some(v) = self.walk_min_ms {
            cfg.walk_dwell.min_ms = v;
        }
        if let Some(v) = self.walk_max_ms {
            cfg.walk_dwell.max_ms = v;
        }
        if let Some(v) = self.scale {
            cfg.sprite_scale = v;
        }
        cfg.seed = self.seed;
        cfg.validate()?;
        Ok(cfg)
    }
}
