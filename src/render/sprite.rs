use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::pet::animation::{AnimationState, Clip};

/// Orange tabby.
const BASE_COLOR: u32 = 0xFFA532FF;
/// Pink-ish tint while the cursor is over the pet.
const HOVER_TINT: [f32; 3] = [1.0, 0.8, 0.8];

/// Mirror the sprite horizontally.
pub const FLAG_MIRROR: u32 = 1;
/// Use the walk cycle instead of breathing.
pub const FLAG_WALK: u32 = 2;

/// What the shader needs to draw the pet this frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PetSprite {
    /// Sprite centre in screen pixels.
    pub position: [f32; 2],
    /// Sprite extent in screen pixels.
    pub size: [f32; 2],
    /// RGBA color packed as u32.
    pub color: u32,
    /// Frame within the current clip.
    pub frame: u32,
    pub flags: u32,
}

impl PetSprite {
    pub fn new(pos: Vec2, sprite: Vec2, anim: &AnimationState, hovered: bool) -> Self {
        let mut flags = 0;
        if anim.cue.facing.faces_left() {
            flags |= FLAG_MIRROR;
        }
        if anim.cue.clip == Clip::Walk {
            flags |= FLAG_WALK;
        }

        let color = if hovered {
            tint(BASE_COLOR, HOVER_TINT)
        } else {
            BASE_COLOR
        };

        Self {
            position: pos.into(),
            size: sprite.into(),
            color,
            frame: anim.frame as u32,
            flags,
        }
    }
}

/// Multiply the RGB channels of a packed RGBA color.
fn tint(color: u32, mul: [f32; 3]) -> u32 {
    let channel = |shift: u32, m: f32| {
        let c = ((color >> shift) & 0xFF) as f32 * m;
        (c.round().clamp(0.0, 255.0) as u32) << shift
    };
    channel(24, mul[0]) | channel(16, mul[1]) | channel(8, mul[2]) | (color & 0xFF)
}
