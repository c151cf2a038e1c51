/// Half-open range `[min_ms, max_ms)` a dwell duration is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DwellRange {
    pub min_ms: f32,
    pub max_ms: f32,
}

impl DwellRange {
    pub const fn new(min_ms: f32, max_ms: f32) -> Self {
        Self { min_ms, max_ms }
    }

    /// Uniform sample from `[min_ms, max_ms)`.
    ///
    /// Called on every entry into Idle or Walk; results are never cached.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> f32 {
        let t = rng.f32();
        let ms = self.min_ms + (self.max_ms - self.min_ms) * t;
        // f32 rounding can land exactly on max for t close to 1.0
        if ms >= self.max_ms {
            self.min_ms.max(prev_f32(self.max_ms))
        } else {
            ms
        }
    }

    #[cfg(test)]
    pub fn contains(&self, ms: f32) -> bool {
        ms >= self.min_ms && ms < self.max_ms
    }
}

/// Largest f32 strictly below `x` (positive finite `x` only).
fn prev_f32(x: f32) -> f32 {
    if x > 0.0 {
        f32::from_bits(x.to_bits() - 1)
    } else {
        x
    }
}
