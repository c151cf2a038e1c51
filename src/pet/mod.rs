pub mod animation;
pub mod direction;
pub mod dwell;

use glam::Vec2;

use crate::config::PetConfig;
use crate::movement::Viewport;

/// On-screen size of the pet: the full sprite, and the smaller clickable part of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    /// Visual sprite extent in viewport pixels.
    pub sprite: Vec2,
    /// Interaction footprint in viewport pixels. Never larger than `sprite`.
    pub hit: Vec2,
}

impl Footprint {
    /// Scale the configured frame and hit box by sprite scale times display scale.
    pub fn from_config(config: &PetConfig, scale_factor: f32) -> Self {
        let scale = config.sprite_scale * scale_factor.max(0.0);
        let sprite = Vec2::splat(config.frame_size) * scale;
        let hit = (Vec2::new(config.hit_width, config.hit_height) * scale).min(sprite);
        Self { sprite, hit }
    }

    /// Inset used by the boundary clamp: half the sprite on each axis.
    pub fn margin(&self) -> Vec2 {
        self.sprite * 0.5
    }
}

/// Where a freshly created pet sits.
pub fn spawn_position(viewport: Viewport) -> Vec2 {
    Vec2::new(viewport.width * 0.5, viewport.height * 0.5)
}
