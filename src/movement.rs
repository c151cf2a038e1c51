use glam::Vec2;

/// Current size of the drawable surface in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Result of a boundary clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamped {
    pub pos: Vec2,
    /// True if either axis had to be moved.
    pub hit: bool,
}

/// Confine `pos` to `[margin, dimension - margin]` on each axis independently.
///
/// An axis narrower than twice its margin pins to the viewport centre.
pub fn clamp(pos: Vec2, viewport: Viewport, margin: Vec2) -> Clamped {
    let x = clamp_axis(pos.x, viewport.width, margin.x);
    let y = clamp_axis(pos.y, viewport.height, margin.y);
    let clamped = Vec2::new(x, y);
    Clamped {
        pos: clamped,
        hit: clamped != pos,
    }
}

fn clamp_axis(v: f32, extent: f32, margin: f32) -> f32 {
    let lo = margin;
    let hi = extent - margin;
    if lo > hi {
        return extent * 0.5;
    }
    v.clamp(lo, hi)
}

/// Displacement for one tick of walking.
pub fn step(dir: Vec2, speed: f32, delta_ms: f32) -> Vec2 {
    dir * speed * (delta_ms / 1000.0)
}
